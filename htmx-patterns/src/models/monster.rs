//! The monster record, its state transitions and validation rules.

use chrono::{Months, NaiveDate};
use rand::{seq::IndexedRandom, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a stored monster
pub type MonsterId = u64;

/// Maximum length of a monster name
pub const NAME_MAX_LEN: usize = 100;

/// Monsters older than this may not be happy
pub const HAPPY_AGE_LIMIT_YEARS: u32 = 10;

/// Name prefixes monsters are not allowed to use (compared case-insensitively)
pub const DISALLOWED_HONORIFICS: &[&str] = &["mr", "mrs", "ms", "miss", "dr"];

/// Fixed set of monster categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterKind {
    #[default]
    Gremlin,
    Troll,
    Goblin,
    Ogre,
}

impl MonsterKind {
    /// All kinds, in display order
    pub const ALL: [MonsterKind; 4] = [Self::Gremlin, Self::Troll, Self::Goblin, Self::Ogre];

    /// Form/storage value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gremlin => "gremlin",
            Self::Troll => "troll",
            Self::Goblin => "goblin",
            Self::Ogre => "ogre",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gremlin => "Gremlin",
            Self::Troll => "Troll",
            Self::Goblin => "Goblin",
            Self::Ogre => "Ogre",
        }
    }
}

impl fmt::Display for MonsterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MonsterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown monster kind: {s}"))
    }
}

/// Named state transitions on a monster's mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Flip the mood
    Toggle,
    /// Force unhappy
    Kick,
    /// Force happy
    Hug,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toggle => write!(f, "toggle"),
            Self::Kick => write!(f, "kick"),
            Self::Hug => write!(f, "hug"),
        }
    }
}

/// A stored monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub name: String,
    pub is_happy: bool,
    pub date_of_birth: Option<NaiveDate>,
    pub kind: MonsterKind,
}

impl Monster {
    /// Build a stored monster from creation data
    pub fn from_new(id: MonsterId, new: NewMonster) -> Self {
        Self {
            id,
            name: new.name,
            is_happy: new.is_happy,
            date_of_birth: new.date_of_birth,
            kind: new.kind,
        }
    }

    pub fn toggle(&mut self) {
        self.is_happy = !self.is_happy;
    }

    pub fn kick(&mut self) {
        self.is_happy = false;
    }

    pub fn hug(&mut self) {
        self.is_happy = true;
    }

    /// Apply a named transition. The caller persists the result.
    pub fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Toggle => self.toggle(),
            Transition::Kick => self.kick(),
            Transition::Hug => self.hug(),
        }
    }
}

impl fmt::Display for Monster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Data for creating a monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMonster {
    pub name: String,
    pub is_happy: bool,
    pub date_of_birth: Option<NaiveDate>,
    pub kind: MonsterKind,
}

impl NewMonster {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_happy: true,
            date_of_birth: None,
            kind: MonsterKind::default(),
        }
    }

    #[must_use]
    pub fn happy(mut self, is_happy: bool) -> Self {
        self.is_happy = is_happy;
        self
    }

    #[must_use]
    pub fn born(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: MonsterKind) -> Self {
        self.kind = kind;
        self
    }
}

/// A broken monster invariant.
///
/// Field-level errors report the field they belong to; the age/mood conflict
/// is a whole-record error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonsterValidationError {
    #[error("Monsters don't use honorifics like \"{0}\".")]
    HonorificName(String),

    #[error("Ensure this value has at most {NAME_MAX_LEN} characters (it has {0}).")]
    NameTooLong(usize),

    #[error("Date of birth cannot be in the future.")]
    FutureBirthDate,

    #[error("Monsters older than {HAPPY_AGE_LIMIT_YEARS} years cannot be happy.")]
    TooOldToBeHappy,
}

impl MonsterValidationError {
    /// The field this error belongs to, or `None` for whole-record errors
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::HonorificName(_) | Self::NameTooLong(_) => Some("name"),
            Self::FutureBirthDate => Some("date_of_birth"),
            Self::TooOldToBeHappy => None,
        }
    }
}

/// Reject names that are too long or start with a disallowed honorific.
pub fn validate_name(name: &str) -> Result<(), MonsterValidationError> {
    let len = name.chars().count();
    if len > NAME_MAX_LEN {
        return Err(MonsterValidationError::NameTooLong(len));
    }

    let lowered = name.trim().to_lowercase();
    for honorific in DISALLOWED_HONORIFICS {
        if let Some(rest) = lowered.strip_prefix(honorific) {
            if rest.is_empty() || rest.starts_with(' ') || rest.starts_with('.') {
                let original: String = name.trim().chars().take(honorific.len()).collect();
                return Err(MonsterValidationError::HonorificName(original));
            }
        }
    }
    Ok(())
}

/// Reject birth dates after `today`.
pub fn validate_date_of_birth(
    date_of_birth: NaiveDate,
    today: NaiveDate,
) -> Result<(), MonsterValidationError> {
    if date_of_birth > today {
        Err(MonsterValidationError::FutureBirthDate)
    } else {
        Ok(())
    }
}

/// Whether a monster born on `date_of_birth` is past the happy age limit on `today`.
pub fn is_older_than_limit(date_of_birth: NaiveDate, today: NaiveDate) -> bool {
    match today.checked_sub_months(Months::new(HAPPY_AGE_LIMIT_YEARS * 12)) {
        Some(cutoff) => date_of_birth < cutoff,
        None => false,
    }
}

/// Whole-record rule: old monsters may not be happy.
///
/// Only checked at validation time; the store accepts any combination.
pub fn clean_record(
    is_happy: bool,
    date_of_birth: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), MonsterValidationError> {
    match date_of_birth {
        Some(dob) if is_happy && is_older_than_limit(dob, today) => {
            Err(MonsterValidationError::TooOldToBeHappy)
        }
        _ => Ok(()),
    }
}

const FIRST_NAMES: &[&str] = &[
    "Agnes", "Bartholomew", "Bertha", "Boris", "Clementine", "Cyril", "Delphine", "Dmitri",
    "Edith", "Ezekiel", "Fenella", "Gideon", "Griselda", "Horace", "Ingrid", "Jasper", "Kasimir",
    "Lavinia", "Mortimer", "Nigel", "Ophelia", "Percival", "Quentin", "Rosalind", "Septimus",
    "Tabitha", "Ulrich", "Vesper", "Winifred", "Xavier", "Yorick", "Zelda",
];

/// Generate `count` random monsters, born within the last 20 years.
///
/// Generated records may break the age/mood rule; that rule is not a storage
/// constraint.
pub fn random_monsters(count: usize, today: NaiveDate) -> Vec<NewMonster> {
    let mut rng = rand::rng();
    (0..count)
        .map(|_| {
            let name = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Monster");
            let kind = MonsterKind::ALL
                .choose(&mut rng)
                .copied()
                .unwrap_or_default();
            let age_days = rng.random_range(0..(20 * 365));
            let mut new = NewMonster::new(name)
                .happy(rng.random_bool(0.5))
                .kind(kind);
            if let Some(dob) = today.checked_sub_days(chrono::Days::new(age_days)) {
                new = new.born(dob);
            }
            new
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monster(is_happy: bool) -> Monster {
        Monster::from_new(1, NewMonster::new("Boris").happy(is_happy))
    }

    #[test]
    fn test_transitions() {
        let mut m = monster(true);
        m.apply(Transition::Toggle);
        assert!(!m.is_happy);
        m.apply(Transition::Toggle);
        assert!(m.is_happy);

        m.apply(Transition::Kick);
        assert!(!m.is_happy);
        m.apply(Transition::Kick);
        assert!(!m.is_happy);

        m.apply(Transition::Hug);
        assert!(m.is_happy);
        m.apply(Transition::Hug);
        assert!(m.is_happy);
    }

    #[test]
    fn test_honorific_names_rejected() {
        assert_eq!(
            validate_name("Mr Smith"),
            Err(MonsterValidationError::HonorificName("Mr".to_string()))
        );
        assert!(validate_name("mrs. Jones").is_err());
        assert!(validate_name("DR Who").is_err());
        assert!(validate_name("Miss").is_err());
        assert_eq!(
            validate_name("Mr Smith").unwrap_err().field(),
            Some("name")
        );
    }

    #[test]
    fn test_names_that_only_look_like_honorifics_pass() {
        assert!(validate_name("Mrsomething").is_ok());
        assert!(validate_name("Drusilla").is_ok());
        assert!(validate_name("Missy").is_ok());
        assert!(validate_name("Boris").is_ok());
    }

    #[test]
    fn test_name_too_long() {
        let name = "x".repeat(NAME_MAX_LEN + 1);
        assert_eq!(
            validate_name(&name),
            Err(MonsterValidationError::NameTooLong(NAME_MAX_LEN + 1))
        );
    }

    #[test]
    fn test_future_birth_date_rejected() {
        let today = date(2024, 6, 1);
        assert_eq!(
            validate_date_of_birth(date(2024, 6, 2), today),
            Err(MonsterValidationError::FutureBirthDate)
        );
        assert!(validate_date_of_birth(today, today).is_ok());
        assert_eq!(
            MonsterValidationError::FutureBirthDate.field(),
            Some("date_of_birth")
        );
    }

    #[test]
    fn test_old_and_happy_is_a_record_error() {
        let today = date(2024, 6, 1);
        let old = date(2010, 1, 1);
        let err = clean_record(true, Some(old), today).unwrap_err();
        assert_eq!(err, MonsterValidationError::TooOldToBeHappy);
        assert_eq!(err.field(), None);

        assert!(clean_record(false, Some(old), today).is_ok());
        assert!(clean_record(true, Some(date(2020, 1, 1)), today).is_ok());
        assert!(clean_record(true, None, today).is_ok());
    }

    #[test]
    fn test_age_limit_boundary() {
        let today = date(2024, 6, 1);
        assert!(!is_older_than_limit(date(2014, 6, 1), today));
        assert!(is_older_than_limit(date(2014, 5, 31), today));
    }

    #[test]
    fn test_kind_round_trips_through_form_value() {
        for kind in MonsterKind::ALL {
            assert_eq!(kind.as_str().parse::<MonsterKind>(), Ok(kind));
        }
        assert!("dragon".parse::<MonsterKind>().is_err());
    }

    #[test]
    fn test_random_monsters() {
        let today = date(2024, 6, 1);
        let monsters = random_monsters(5, today);
        assert_eq!(monsters.len(), 5);
        for m in &monsters {
            assert!(FIRST_NAMES.contains(&m.name.as_str()));
            assert!(validate_name(&m.name).is_ok());
            assert!(m.date_of_birth.is_some_and(|dob| dob <= today));
        }
    }
}
