use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Coarse skin color bias toward blue (cool) or red (warm).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Undertone {
    Cool,
    Neutral,
    Warm,
}

impl Undertone {
    pub const ALL: [Undertone; 3] = [Undertone::Cool, Undertone::Neutral, Undertone::Warm];

    pub fn label(self) -> &'static str {
        match self {
            Undertone::Cool => "Cool",
            Undertone::Neutral => "Neutral",
            Undertone::Warm => "Warm",
        }
    }
}

impl fmt::Display for Undertone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Undertone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Undertone::ALL
            .into_iter()
            .find(|u| u.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown undertone '{s}'"))
    }
}
