//! Per-language number symbols and date/time patterns
//!
//! Only the data the message formatter needs. Languages without an entry use
//! the English data; month and day names always come from chrono's locale
//! tables.

use crate::locale::Locale;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Length of a date or time rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// Numeric, e.g. `1/2/24`
    Short,
    /// Abbreviated month, e.g. `Jan 2, 2024`
    Medium,
    /// Full month, e.g. `January 2, 2024`
    Long,
    /// With weekday, e.g. `Tuesday, January 2, 2024`
    Full,
}

/// Number symbols of one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSymbols {
    /// Decimal separator
    pub decimal: char,
    /// Grouping separator
    pub group: char,
    /// Minus sign
    pub minus: char,
    /// Text appended to percentages, including any spacing
    pub percent_suffix: &'static str,
}

/// Date/time patterns of one language, in strftime syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePatterns {
    date: [&'static str; 4],
    time: [&'static str; 4],
    /// Placed between date and time in combined renderings
    pub joiner: &'static str,
}

impl DatePatterns {
    /// Date pattern for `style`
    pub fn date(&self, style: DateStyle) -> &'static str {
        self.date[style as usize]
    }

    /// Time pattern for `style`
    pub fn time(&self, style: DateStyle) -> &'static str {
        self.time[style as usize]
    }
}

/// Everything the formatter needs to know about a language
#[derive(Debug, Clone, Copy)]
pub struct LocaleData {
    /// Number symbols
    pub numbers: NumberSymbols,
    /// Date/time patterns
    pub dates: DatePatterns,
    /// chrono locale used for month and weekday names
    pub chrono_locale: &'static str,
}

const ENGLISH: LocaleData = LocaleData {
    numbers: NumberSymbols {
        decimal: '.',
        group: ',',
        minus: '-',
        percent_suffix: "%",
    },
    dates: DatePatterns {
        date: ["%-m/%-d/%y", "%b %-d, %Y", "%B %-d, %Y", "%A, %B %-d, %Y"],
        time: ["%-I:%M %p", "%-I:%M:%S %p", "%-I:%M:%S %p %Z", "%-I:%M:%S %p %Z"],
        joiner: ", ",
    },
    chrono_locale: "en_US",
};

const EUROPEAN_TIME: [&str; 4] = ["%H:%M", "%H:%M:%S", "%H:%M:%S %Z", "%H:%M:%S %Z"];

static LOCALE_DATA: Lazy<HashMap<&'static str, LocaleData>> = Lazy::new(|| {
    let comma_dot = NumberSymbols {
        decimal: ',',
        group: '.',
        minus: '-',
        percent_suffix: "\u{a0}%",
    };
    let comma_space = NumberSymbols {
        decimal: ',',
        group: '\u{a0}',
        minus: '-',
        percent_suffix: "\u{a0}%",
    };

    HashMap::from([
        ("en", ENGLISH),
        (
            "de",
            LocaleData {
                numbers: comma_dot,
                dates: DatePatterns {
                    date: ["%d.%m.%y", "%d.%m.%Y", "%-d. %B %Y", "%A, %-d. %B %Y"],
                    time: EUROPEAN_TIME,
                    joiner: ", ",
                },
                chrono_locale: "de_DE",
            },
        ),
        (
            "es",
            LocaleData {
                numbers: comma_dot,
                dates: DatePatterns {
                    date: ["%-d/%-m/%y", "%-d %b %Y", "%-d de %B de %Y", "%A, %-d de %B de %Y"],
                    time: ["%-H:%M", "%-H:%M:%S", "%-H:%M:%S %Z", "%-H:%M:%S %Z"],
                    joiner: ", ",
                },
                chrono_locale: "es_ES",
            },
        ),
        (
            "fr",
            LocaleData {
                numbers: NumberSymbols {
                    decimal: ',',
                    group: '\u{202f}',
                    minus: '-',
                    percent_suffix: "\u{a0}%",
                },
                dates: DatePatterns {
                    date: ["%d/%m/%Y", "%-d %b %Y", "%-d %B %Y", "%A %-d %B %Y"],
                    time: EUROPEAN_TIME,
                    joiner: " ",
                },
                chrono_locale: "fr_FR",
            },
        ),
        (
            "it",
            LocaleData {
                numbers: NumberSymbols {
                    percent_suffix: "%",
                    ..comma_dot
                },
                dates: DatePatterns {
                    date: ["%d/%m/%y", "%-d %b %Y", "%-d %B %Y", "%A %-d %B %Y"],
                    time: EUROPEAN_TIME,
                    joiner: ", ",
                },
                chrono_locale: "it_IT",
            },
        ),
        (
            "nl",
            LocaleData {
                numbers: NumberSymbols {
                    percent_suffix: "%",
                    ..comma_dot
                },
                dates: DatePatterns {
                    date: ["%d-%m-%Y", "%-d %b %Y", "%-d %B %Y", "%A %-d %B %Y"],
                    time: EUROPEAN_TIME,
                    joiner: " ",
                },
                chrono_locale: "nl_NL",
            },
        ),
        (
            "pt",
            LocaleData {
                numbers: NumberSymbols {
                    percent_suffix: "%",
                    ..comma_dot
                },
                dates: DatePatterns {
                    date: ["%d/%m/%Y", "%-d de %b de %Y", "%-d de %B de %Y", "%A, %-d de %B de %Y"],
                    time: EUROPEAN_TIME,
                    joiner: " ",
                },
                chrono_locale: "pt_BR",
            },
        ),
        (
            "ru",
            LocaleData {
                numbers: comma_space,
                dates: DatePatterns {
                    date: ["%d.%m.%Y", "%-d %b %Y г.", "%-d %B %Y г.", "%A, %-d %B %Y г."],
                    time: EUROPEAN_TIME,
                    joiner: ", ",
                },
                chrono_locale: "ru_RU",
            },
        ),
        (
            "pl",
            LocaleData {
                numbers: comma_space,
                dates: DatePatterns {
                    date: ["%d.%m.%Y", "%-d %b %Y", "%-d %B %Y", "%A, %-d %B %Y"],
                    time: EUROPEAN_TIME,
                    joiner: ", ",
                },
                chrono_locale: "pl_PL",
            },
        ),
        (
            "sv",
            LocaleData {
                numbers: NumberSymbols {
                    minus: '\u{2212}',
                    ..comma_space
                },
                dates: DatePatterns {
                    date: ["%Y-%m-%d", "%-d %b %Y", "%-d %B %Y", "%A %-d %B %Y"],
                    time: EUROPEAN_TIME,
                    joiner: " ",
                },
                chrono_locale: "sv_SE",
            },
        ),
        (
            "ja",
            LocaleData {
                numbers: ENGLISH.numbers,
                dates: DatePatterns {
                    date: ["%Y/%m/%d", "%Y/%m/%d", "%Y年%-m月%-d日", "%Y年%-m月%-d日%A"],
                    time: ["%-H:%M", "%-H:%M:%S", "%-H:%M:%S %Z", "%-H時%M分%S秒 %Z"],
                    joiner: " ",
                },
                chrono_locale: "ja_JP",
            },
        ),
        (
            "zh",
            LocaleData {
                numbers: ENGLISH.numbers,
                dates: DatePatterns {
                    date: ["%Y/%-m/%-d", "%Y年%-m月%-d日", "%Y年%-m月%-d日", "%Y年%-m月%-d日%A"],
                    time: EUROPEAN_TIME,
                    joiner: " ",
                },
                chrono_locale: "zh_CN",
            },
        ),
    ])
});

/// Formatting data for `locale`, English when the language is unknown
pub fn locale_data(locale: &Locale) -> LocaleData {
    LOCALE_DATA
        .get(locale.language())
        .copied()
        .unwrap_or(ENGLISH)
}

/// chrono locale for month and weekday names.
///
/// Prefers the exact `lang_REGION`, then the language's default region, then
/// POSIX.
pub fn chrono_locale(locale: &Locale, data: &LocaleData) -> chrono::Locale {
    let exact = locale
        .region()
        .map(|region| format!("{}_{region}", locale.language()));

    exact
        .as_deref()
        .and_then(|name| chrono::Locale::try_from(name).ok())
        .or_else(|| chrono::Locale::try_from(data.chrono_locale).ok())
        .unwrap_or(chrono::Locale::POSIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).unwrap()
    }

    #[test]
    fn test_known_and_unknown_languages() {
        assert_eq!(locale_data(&locale("de-AT")).numbers.decimal, ',');
        assert_eq!(locale_data(&locale("en-GB")).numbers.decimal, '.');
        assert_eq!(locale_data(&locale("tlh")).numbers, ENGLISH.numbers);
        assert_eq!(locale_data(&Locale::root()).numbers, ENGLISH.numbers);
    }

    #[test]
    fn test_style_lookup() {
        let data = locale_data(&locale("en"));
        assert_eq!(data.dates.date(DateStyle::Short), "%-m/%-d/%y");
        assert_eq!(data.dates.time(DateStyle::Medium), "%-I:%M:%S %p");
    }

    #[test]
    fn test_chrono_locale_resolution() {
        let en = locale("en");
        assert!(matches!(chrono_locale(&en, &locale_data(&en)), chrono::Locale::en_US));

        let de_at = locale("de-AT");
        assert!(matches!(chrono_locale(&de_at, &locale_data(&de_at)), chrono::Locale::de_AT));

        let unknown = locale("tlh");
        assert!(matches!(
            chrono_locale(&unknown, &locale_data(&unknown)),
            chrono::Locale::en_US
        ));
    }
}
