//! Domain model: a single mutable record type.

mod monster;

pub use monster::{
    clean_record, is_older_than_limit, random_monsters, validate_date_of_birth, validate_name,
    Monster, MonsterId, MonsterKind, MonsterValidationError, NewMonster, Transition,
    DISALLOWED_HONORIFICS, HAPPY_AGE_LIMIT_YEARS, NAME_MAX_LEN,
};
