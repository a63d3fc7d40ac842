// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User-facing text in the supported languages.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Display language. Russian is the product's primary language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" | "ru-ru" | "ru_ru" => Ok(Locale::Ru),
            "en" | "en-us" | "en_us" => Ok(Locale::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

impl Locale {
    /// Locale used for month names in dates.
    pub fn chrono_locale(self) -> chrono::Locale {
        match self {
            Locale::Ru => chrono::Locale::ru_RU,
            Locale::En => chrono::Locale::en_US,
        }
    }

    pub fn distance_unit(self) -> &'static str {
        match self {
            Locale::Ru => "км",
            Locale::En => "km",
        }
    }

    pub fn pace_unit(self) -> &'static str {
        match self {
            Locale::Ru => "мин/км",
            Locale::En => "min/km",
        }
    }

    /// Suffixes for the coarse "1ч 5м" total-time rendering.
    pub fn hour_minute_suffixes(self) -> (&'static str, &'static str) {
        match self {
            Locale::Ru => ("ч", "м"),
            Locale::En => ("h", "m"),
        }
    }

    pub fn no_runs_message(self) -> &'static str {
        match self {
            Locale::Ru => "Пока нет пробежек. Добавьте свою первую тренировку!",
            Locale::En => "No runs yet. Add your first workout!",
        }
    }

    pub fn duration_required(self) -> &'static str {
        match self {
            Locale::Ru => "Укажите продолжительность пробежки",
            Locale::En => "Specify the run duration",
        }
    }

    pub fn duration_too_long(self) -> &'static str {
        match self {
            Locale::Ru => "Слишком большая продолжительность пробежки",
            Locale::En => "The run duration is too long",
        }
    }

    pub fn distance_invalid(self) -> &'static str {
        match self {
            Locale::Ru => "Укажите дистанцию больше нуля",
            Locale::En => "Specify a distance greater than zero",
        }
    }

    pub fn run_added(self) -> &'static str {
        match self {
            Locale::Ru => "Пробежка добавлена!",
            Locale::En => "Run added!",
        }
    }

    pub fn run_added_encouragement(self) -> &'static str {
        match self {
            Locale::Ru => "Отличная работа! Продолжай в том же духе.",
            Locale::En => "Great job! Keep it up.",
        }
    }

    pub fn signed_out_title(self) -> &'static str {
        match self {
            Locale::Ru => "Выход выполнен",
            Locale::En => "Signed out",
        }
    }

    pub fn signed_out_farewell(self) -> &'static str {
        match self {
            Locale::Ru => "До скорой встречи!",
            Locale::En => "See you soon!",
        }
    }

    pub fn error_title(self) -> &'static str {
        match self {
            Locale::Ru => "Ошибка",
            Locale::En => "Error",
        }
    }

    pub fn greeting(self, name: &str) -> String {
        match self {
            Locale::Ru => format!("Привет, {name}!"),
            Locale::En => format!("Hi, {name}!"),
        }
    }

    pub fn stats_subtitle(self) -> &'static str {
        match self {
            Locale::Ru => "Вот ваша статистика пробежек",
            Locale::En => "Here are your running stats",
        }
    }

    pub fn history_title(self) -> &'static str {
        match self {
            Locale::Ru => "История пробежек",
            Locale::En => "Run history",
        }
    }

    pub fn add_run(self) -> &'static str {
        match self {
            Locale::Ru => "Добавить пробежку",
            Locale::En => "Add run",
        }
    }

    pub fn sign_out(self) -> &'static str {
        match self {
            Locale::Ru => "Выход",
            Locale::En => "Sign out",
        }
    }

    /// Titles of the four stats cards, in display order.
    pub fn stats_card_titles(self) -> [&'static str; 4] {
        match self {
            Locale::Ru => [
                "Всего пробежек",
                "Общая дистанция",
                "Общее время",
                "Средний темп",
            ],
            Locale::En => ["Total runs", "Total distance", "Total time", "Average pace"],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("ru".parse::<Locale>(), Ok(Locale::Ru));
        assert_eq!("EN-us".parse::<Locale>(), Ok(Locale::En));
        assert!("de".parse::<Locale>().is_err());
    }
}
