use chrono::NaiveDate;
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use typed_builder::TypedBuilder;

/// Calendar month, used both as the path segment of a month page and as the
/// `month` column of the output.
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
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub fn slug(self) -> &'static str {
        self.into()
    }
}

/// One row of the festival table of a month page.
///
/// Field order is the column order of the exported file.
#[derive(
    Clone, PartialEq, Eq, Debug, TypedBuilder, CopyGetters, Getters, Serialize, Deserialize,
)]
pub struct FestivalRecord {
    #[getset(get_copy = "pub")]
    #[serde(rename = "date_iso")]
    date: Option<NaiveDate>,
    #[getset(get = "pub")]
    date_label: String,
    #[getset(get = "pub")]
    day: String,
    #[getset(get = "pub")]
    festival: String,
    #[getset(get_copy = "pub")]
    month: Month,
    #[getset(get = "pub")]
    source_url: String,
}
