use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::domain::GSError;

pub const DATASET_SIZE: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    Dice,
    Crash,
    Plinko,
    Mines,
    Wheel,
    Blackjack,
}

impl Game {
    /// All categories in generation order.
    pub const ALL: [Game; 6] = [
        Game::Dice,
        Game::Crash,
        Game::Plinko,
        Game::Mines,
        Game::Wheel,
        Game::Blackjack,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Game::Dice => "Dice",
            Game::Crash => "Crash",
            Game::Plinko => "Plinko",
            Game::Mines => "Mines",
            Game::Wheel => "Wheel",
            Game::Blackjack => "Blackjack",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Game::Dice => "Classic dice game",
            Game::Crash => "Watch the multiplier grow",
            Game::Plinko => "Drop the ball",
            Game::Mines => "Avoid the mines",
            Game::Wheel => "Spin the wheel",
            Game::Blackjack => "Card game",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Game {
    type Err = GSError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Game::ALL
            .iter()
            .find(|g| g.name().eq_ignore_ascii_case(needle))
            .copied()
            .ok_or_else(|| GSError::UnknownGame(needle.to_string()))
    }
}

/// One row of synthetic betting activity. Numeric fields are kept in their
/// display precision.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub game: Game,
    pub player: String,
    pub bet: String,
    pub multiplier: String,
    pub profit: String,
}

impl Record {
    pub fn new(
        game: Game,
        player: impl Into<String>,
        bet: f64,
        multiplier: f64,
        profit: f64,
    ) -> Self {
        Record {
            game,
            player: player.into(),
            bet: format!("{bet:.8}"),
            multiplier: format!("{multiplier:.2}"),
            profit: format!("{profit:.8}"),
        }
    }

    pub fn cells(&self) -> [&str; 5] {
        [
            self.game.name(),
            &self.player,
            &self.bet,
            &self.multiplier,
            &self.profit,
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Generate the session dataset from `seed`, or from a fresh random seed.
    /// The seed in use is logged so a session can be replayed with `--seed`.
    pub fn seeded(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        info!("Generating dataset with seed {seed}");
        let mut rng = StdRng::seed_from_u64(seed);
        generate_dataset(&mut rng)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn count(&self, game: Game) -> usize {
        self.records.iter().filter(|r| r.game == game).count()
    }
}

/// Build the fixed-size dataset. Categories are assigned round-robin so the
/// dataset order cycles through `Game::ALL`.
pub fn generate_dataset<R: Rng>(rng: &mut R) -> Dataset {
    let records = (0..DATASET_SIZE)
        .map(|i| {
            Record::new(
                Game::ALL[i % Game::ALL.len()],
                format!("Player{}", i + 1),
                rng.random_range(0.0..0.1),
                rng.random_range(1.0..11.0),
                rng.random_range(0.0..0.1),
            )
        })
        .collect::<Vec<Record>>();
    debug!("Generated {} records", records.len());
    Dataset::from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_has_fixed_size_and_known_games() {
        let dataset = Dataset::seeded(Some(42));
        assert_eq!(dataset.len(), DATASET_SIZE);
        assert!(dataset.records().iter().all(|r| Game::ALL.contains(&r.game)));
    }

    #[test]
    fn games_are_assigned_round_robin() {
        let dataset = Dataset::seeded(Some(1));
        for (i, record) in dataset.records().iter().enumerate() {
            assert_eq!(record.game, Game::ALL[i % 6]);
            assert_eq!(record.player, format!("Player{}", i + 1));
        }
        for game in Game::ALL {
            assert_eq!(dataset.count(game), 5);
        }
    }

    #[test]
    fn same_seed_same_dataset() {
        let a = Dataset::seeded(Some(7));
        let b = Dataset::seeded(Some(7));
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn values_are_in_range_and_formatted() {
        let dataset = Dataset::seeded(Some(99));
        for r in dataset.records() {
            let bet: f64 = r.bet.parse().unwrap();
            let multiplier: f64 = r.multiplier.parse().unwrap();
            let profit: f64 = r.profit.parse().unwrap();
            assert!((0.0..=0.1).contains(&bet));
            assert!((1.0..=11.0).contains(&multiplier));
            assert!((0.0..=0.1).contains(&profit));
            assert_eq!(r.bet.split('.').nth(1).map(str::len), Some(8));
            assert_eq!(r.multiplier.split('.').nth(1).map(str::len), Some(2));
            assert_eq!(r.profit.split('.').nth(1).map(str::len), Some(8));
        }
    }

    #[test]
    fn game_parses_case_insensitive() {
        assert_eq!("dice".parse::<Game>().unwrap(), Game::Dice);
        assert_eq!(" BlackJack ".parse::<Game>().unwrap(), Game::Blackjack);
        assert!(matches!(
            "roulette".parse::<Game>(),
            Err(GSError::UnknownGame(name)) if name == "roulette"
        ));
    }

    #[test]
    fn record_formats_precision() {
        let r = Record::new(Game::Wheel, "Player3", 0.05, 2.5, 0.000000011);
        assert_eq!(r.bet, "0.05000000");
        assert_eq!(r.multiplier, "2.50");
        assert_eq!(r.profit, "0.00000001");
        assert_eq!(r.cells(), ["Wheel", "Player3", "0.05000000", "2.50", "0.00000001"]);
    }
}
