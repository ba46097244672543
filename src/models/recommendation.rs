use std::fmt;

use crate::models::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Selling,
    Buying,
    Wait,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::Selling => "selling",
            Action::Buying => "buying",
            Action::Wait => "doing nothing and wait for another time...",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub today_date: String,
    pub today_rate: f64,
    pub past_date: String,
    pub past_rate: f64,
    pub action: Action,
}

// A higher rate today maps to "selling", a lower one to "buying". Keep this mapping as is.
pub fn recommend(today: &Snapshot, past: &Snapshot) -> Recommendation {
    let action = if today.rate > past.rate {
        Action::Selling
    } else if today.rate < past.rate {
        Action::Buying
    } else {
        Action::Wait
    };

    Recommendation {
        today_date: today.date.clone(),
        today_rate: today.rate,
        past_date: past.date.clone(),
        past_rate: past.rate,
        action,
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "For today's rate of {:.6} on {} and last week's historic rate of {:.6} on {}, we recommend {}.",
            self.today_rate,
            self.today_date,
            self.past_rate,
            self.past_date,
            self.action.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(date: &str, rate: f64) -> Snapshot {
        Snapshot {
            date: date.to_string(),
            base_unit: "EUR".to_string(),
            rate,
        }
    }

    #[test]
    fn lower_rate_today_is_buying() {
        let rec = recommend(&snapshot("2026-10-18", 0.8978), &snapshot("2026-10-11", 0.9978));
        assert_eq!(rec.action, Action::Buying);
    }

    #[test]
    fn higher_rate_today_is_selling() {
        let rec = recommend(&snapshot("2026-10-18", 0.9978), &snapshot("2026-10-11", 0.8978));
        assert_eq!(rec.action, Action::Selling);
    }

    #[test]
    fn equal_rates_wait() {
        let rec = recommend(&snapshot("2026-10-18", 0.8978), &snapshot("2026-10-11", 0.8978));
        assert_eq!(rec.action, Action::Wait);
    }

    #[test]
    fn renders_single_line() {
        let rec = recommend(&snapshot("2026-10-18", 0.8978), &snapshot("2026-10-11", 0.9978));
        assert_eq!(
            rec.to_string(),
            "For today's rate of 0.897800 on 2026-10-18 and last week's historic rate of 0.997800 on 2026-10-11, we recommend buying."
        );
    }

    #[test]
    fn wait_renders_try_later_message() {
        let rec = recommend(&snapshot("a", 1.0), &snapshot("b", 1.0));
        assert!(rec.to_string().ends_with("we recommend doing nothing and wait for another time...."));
    }
}
