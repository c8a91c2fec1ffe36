//! Monster creation forms.

use chrono::NaiveDate;

use super::{Choice, Form, FormData, FormField, ValidatedForm, Widget, REQUIRED_MESSAGE};
use crate::models::{
    clean_record, validate_date_of_birth, validate_name, MonsterKind, NewMonster, NAME_MAX_LEN,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which fields the form has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterFormKind {
    /// name, is_happy, date_of_birth and kind, with htmx field validation
    Full,
    /// name and is_happy only (the modal form)
    Quick,
}

/// Form creating a [`NewMonster`].
#[derive(Debug, Clone)]
pub struct MonsterForm {
    kind: MonsterFormKind,
    form: Form,
    data: FormData,
    today: NaiveDate,
    cleaned: Option<NewMonster>,
}

impl MonsterForm {
    /// Unbound form with every field
    pub fn full(today: NaiveDate) -> Self {
        Self::unbound(MonsterFormKind::Full, today)
    }

    /// Unbound name/mood form
    pub fn quick(today: NaiveDate) -> Self {
        Self::unbound(MonsterFormKind::Quick, today)
    }

    pub fn bind_full(data: &FormData, today: NaiveDate) -> Self {
        Self::bound(MonsterFormKind::Full, data, today)
    }

    pub fn bind_quick(data: &FormData, today: NaiveDate) -> Self {
        Self::bound(MonsterFormKind::Quick, data, today)
    }

    fn unbound(kind: MonsterFormKind, today: NaiveDate) -> Self {
        Self {
            kind,
            form: blank_form(kind),
            data: FormData::default(),
            today,
            cleaned: None,
        }
    }

    fn bound(kind: MonsterFormKind, data: &FormData, today: NaiveDate) -> Self {
        let mut form = blank_form(kind);
        form.is_bound = true;
        for field in &mut form.fields {
            match field.widget {
                Widget::Checkbox => field.checked = checkbox_value(data.get(&field.name)),
                _ => field.value = data.get(&field.name).unwrap_or_default().to_string(),
            }
        }

        Self {
            kind,
            form,
            data: data.clone(),
            today,
            cleaned: None,
        }
    }

    /// Validated creation data, available once [`MonsterForm::is_valid`] passed
    pub fn cleaned(&self) -> Option<&NewMonster> {
        self.cleaned.as_ref()
    }

    pub fn into_cleaned(self) -> Option<NewMonster> {
        self.cleaned
    }

    fn validate(&mut self) -> bool {
        for field in &mut self.form.fields {
            field.errors.clear();
        }
        self.form.non_field_errors.clear();
        self.cleaned = None;

        if !self.form.is_bound {
            return false;
        }

        let name = self.clean_name();
        let is_happy = checkbox_value(self.data.get("is_happy"));
        let (date_of_birth, kind) = match self.kind {
            MonsterFormKind::Full => (self.clean_date_of_birth(), self.clean_kind()),
            MonsterFormKind::Quick => (Ok(None), Ok(MonsterKind::default())),
        };

        // whole-record rule only sees fields that cleaned successfully
        let dob_for_clean = date_of_birth.as_ref().ok().copied().flatten();
        if let Err(e) = clean_record(is_happy, dob_for_clean, self.today) {
            self.form.add_error(e.field(), e.to_string());
        }

        match (name, date_of_birth, kind) {
            (Ok(name), Ok(date_of_birth), Ok(kind)) if !self.form.has_errors() => {
                let mut new = NewMonster::new(name).happy(is_happy).kind(kind);
                new.date_of_birth = date_of_birth;
                self.cleaned = Some(new);
                true
            }
            _ => false,
        }
    }

    fn clean_name(&mut self) -> Result<String, ()> {
        let name = self.data.get("name").unwrap_or_default().trim().to_string();
        if name.is_empty() {
            self.form.add_error(Some("name"), REQUIRED_MESSAGE);
            return Err(());
        }
        match validate_name(&name) {
            Ok(()) => Ok(name),
            Err(e) => {
                self.form.add_error(e.field(), e.to_string());
                Err(())
            }
        }
    }

    fn clean_date_of_birth(&mut self) -> Result<Option<NaiveDate>, ()> {
        let raw = self.data.get("date_of_birth").unwrap_or_default().trim();
        if raw.is_empty() {
            self.form.add_error(Some("date_of_birth"), REQUIRED_MESSAGE);
            return Err(());
        }
        let Ok(dob) = NaiveDate::parse_from_str(raw, DATE_FORMAT) else {
            self.form
                .add_error(Some("date_of_birth"), "Enter a valid date.");
            return Err(());
        };
        match validate_date_of_birth(dob, self.today) {
            Ok(()) => Ok(Some(dob)),
            Err(e) => {
                self.form.add_error(e.field(), e.to_string());
                Err(())
            }
        }
    }

    fn clean_kind(&mut self) -> Result<MonsterKind, ()> {
        let raw = self.data.get("kind").unwrap_or_default().trim();
        if raw.is_empty() {
            self.form.add_error(Some("kind"), REQUIRED_MESSAGE);
            return Err(());
        }
        raw.parse::<MonsterKind>().map_err(|_| {
            self.form.add_error(
                Some("kind"),
                format!("Select a valid choice. {raw} is not one of the available choices."),
            );
        })
    }
}

impl ValidatedForm for MonsterForm {
    fn bind(data: &FormData) -> Self {
        Self::bind_full(data, chrono::Local::now().date_naive())
    }

    fn is_valid(&mut self) -> bool {
        self.validate()
    }

    fn form(&self) -> &Form {
        &self.form
    }
}

fn blank_form(kind: MonsterFormKind) -> Form {
    let mut fields = vec![
        FormField::new("name", "Name", Widget::Text)
            .required()
            .max_length(NAME_MAX_LEN),
        FormField::new("is_happy", "Is happy", Widget::Checkbox).initially_checked(true),
    ];

    if kind == MonsterFormKind::Full {
        fields.push(FormField::new("date_of_birth", "Date of birth", Widget::Date).required());
        fields.push(
            FormField::new("kind", "Kind", Widget::Select)
                .required()
                .initial(MonsterKind::default().as_str())
                .choices(
                    MonsterKind::ALL
                        .iter()
                        .map(|k| Choice {
                            value: k.as_str().to_string(),
                            label: k.label().to_string(),
                        })
                        .collect(),
                ),
        );
    }

    Form::new(fields).with_htmx_validation(kind == MonsterFormKind::Full)
}

/// Browsers send a checked box as `on`; absence means unchecked.
fn checkbox_value(raw: Option<&str>) -> bool {
    match raw {
        None => false,
        Some(v) => !matches!(v.trim().to_ascii_lowercase().as_str(), "" | "false" | "0" | "off"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MonsterValidationError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn bind(encoded: &str) -> MonsterForm {
        MonsterForm::bind_full(&FormData::parse(encoded), today())
    }

    #[test]
    fn test_valid_full_form() {
        let mut form = bind("name=Boris&is_happy=on&date_of_birth=2020-01-15&kind=troll");
        assert!(form.is_valid());
        let new = form.into_cleaned().unwrap();
        assert_eq!(new.name, "Boris");
        assert!(new.is_happy);
        assert_eq!(new.date_of_birth, NaiveDate::from_ymd_opt(2020, 1, 15));
        assert_eq!(new.kind, MonsterKind::Troll);
    }

    #[test]
    fn test_honorific_is_a_name_error() {
        let mut form = bind("name=Mr+Smith&date_of_birth=2020-01-15&kind=troll");
        assert!(!form.is_valid());
        let errors = &form.form().field("name").unwrap().errors;
        assert_eq!(
            errors,
            &vec![MonsterValidationError::HonorificName("Mr".to_string()).to_string()]
        );
        assert!(form.form().non_field_errors.is_empty());
    }

    #[test]
    fn test_future_date_is_a_date_error() {
        let mut form = bind("name=Boris&date_of_birth=2024-06-02&kind=troll");
        assert!(!form.is_valid());
        assert_eq!(
            form.form().field("date_of_birth").unwrap().errors,
            vec![MonsterValidationError::FutureBirthDate.to_string()]
        );
    }

    #[test]
    fn test_old_and_happy_is_a_form_error() {
        let mut form = bind("name=Boris&is_happy=on&date_of_birth=2001-01-01&kind=ogre");
        assert!(!form.is_valid());
        assert_eq!(
            form.form().non_field_errors,
            vec![MonsterValidationError::TooOldToBeHappy.to_string()]
        );
        assert!(form.form().fields.iter().all(|f| f.errors.is_empty()));

        let mut unhappy = bind("name=Boris&date_of_birth=2001-01-01&kind=ogre");
        assert!(unhappy.is_valid());
    }

    #[test]
    fn test_required_and_malformed_values() {
        let mut form = bind("date_of_birth=yesterday&kind=dragon");
        assert!(!form.is_valid());
        let f = form.form();
        assert_eq!(f.field("name").unwrap().errors, vec![REQUIRED_MESSAGE]);
        assert_eq!(
            f.field("date_of_birth").unwrap().errors,
            vec!["Enter a valid date."]
        );
        assert!(f.field("kind").unwrap().errors[0].contains("dragon"));
        assert_eq!(f.field("kind").unwrap().value, "dragon");
    }

    #[test]
    fn test_quick_form_only_needs_a_name() {
        let mut form = MonsterForm::bind_quick(&FormData::parse("name=Zelda"), today());
        assert!(form.is_valid());
        let new = form.cleaned().unwrap();
        assert!(!new.is_happy);
        assert_eq!(new.date_of_birth, None);
        assert!(!form.form().do_htmx_validation);
        assert!(form.form().field("kind").is_none());
    }

    #[test]
    fn test_unbound_form_is_not_valid_and_has_no_errors() {
        let mut form = MonsterForm::full(today());
        assert!(!form.is_valid());
        assert!(!form.form().has_errors());
        assert!(form.form().field("is_happy").unwrap().checked);
        assert_eq!(form.form().field("kind").unwrap().value, "gremlin");
    }

    #[test]
    fn test_checkbox_values() {
        assert!(checkbox_value(Some("on")));
        assert!(checkbox_value(Some("true")));
        assert!(!checkbox_value(Some("false")));
        assert!(!checkbox_value(Some("")));
        assert!(!checkbox_value(None));
    }
}
