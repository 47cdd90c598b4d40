use strum::{Display, EnumIter};

#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum FestivalCategory {
    Hindu,
    Muslim,
    Other,
}

const MUSLIM_KEYWORDS: &[&str] = &[
    "eid",
    "ramzan",
    "ramadan",
    "muharram",
    "shab-e-barat",
    "shab-e-qadr",
    "milad",
    "bakrid",
    "muslim",
    "islam",
    "jamadilakhar",
    "rajab",
];

const HINDU_KEYWORDS: &[&str] = &[
    "diwali",
    "holi",
    "navratri",
    "dussehra",
    "ganesh",
    "durga",
    "ram",
    "krishna",
    "shiv",
    "hanuman",
    "puja",
    "ekadashi",
    "sankranti",
    "purnima",
    "amavasya",
    "chaturthi",
    "ashtami",
    "jayanti",
    "pradosh",
    "shivaratri",
    "panchmi",
];

/// Festivals following the lunar calendar, whose date moves every year.
const RECURRING_KEYWORDS: &[&str] = &[
    "ekadashi",
    "purnima",
    "amavasya",
    "chaturthi",
    "navratri",
    "dussehra",
    "diwali",
    "holi",
    "ganesh",
    "durga",
    "janmashtami",
    "ram navami",
    "hanuman jayanti",
    "mahashivratri",
    "pradosh",
    "eid",
    "ramzan",
    "ramadan",
    "muharram",
    "bakrid",
    "milad",
    "shab-e",
    "sankashti",
    "vijaya",
    "ashtami",
    "panchmi",
];

/// Festivals celebrated on the same Gregorian date every year.
const FIXED_DATE_KEYWORDS: &[&str] = &[
    "new year",
    "sankranti",
    "republic day",
    "independence day",
    "gandhi jayanti",
    "christmas",
    "ambedkar jayanti",
];

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| name.contains(keyword))
}

impl FestivalCategory {
    /// Classifies a festival by keywords in its name.  Muslim keywords take precedence.
    pub fn of(festival: &str) -> Self {
        let name = festival.to_lowercase();
        if contains_any(&name, MUSLIM_KEYWORDS) {
            Self::Muslim
        } else if contains_any(&name, HINDU_KEYWORDS) {
            Self::Hindu
        } else {
            Self::Other
        }
    }
}

/// Whether the date of the festival changes from year to year.
/// Unknown festivals are assumed to be recurring.
pub fn is_recurring(festival: &str) -> bool {
    let name = festival.to_lowercase();
    if contains_any(&name, RECURRING_KEYWORDS) {
        return true;
    }
    !contains_any(&name, FIXED_DATE_KEYWORDS)
}
