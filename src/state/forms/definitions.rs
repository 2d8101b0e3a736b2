//! Field schemas and step tables for each form

use super::schema::{FieldSpec, FormSchema, Refinement, Rule, SelectOption};
use super::steps::StepDefinition;

const GENDERS: &[&str] = &["male", "female", "other"];
const MARITAL_STATUSES: &[&str] = &["single", "married", "divorced", "widowed", "other"];
const DISEASE_TYPES: &[&str] = &["malaria", "tb", "hiv"];

/// Programs offered on the enrollment form, detail is the disease type
const PROGRAM_CATALOG: &[SelectOption] = &[
    SelectOption {
        id: "1",
        label: "TB Prevention and Treatment",
        detail: "tb",
    },
    SelectOption {
        id: "2",
        label: "Malaria-Free Communities",
        detail: "malaria",
    },
    SelectOption {
        id: "3",
        label: "HIV Testing and Counseling",
        detail: "hiv",
    },
    SelectOption {
        id: "4",
        label: "Maternal TB Screening",
        detail: "tb",
    },
    SelectOption {
        id: "5",
        label: "Youth HIV Awareness",
        detail: "hiv",
    },
];

const fn text(
    name: &'static str,
    label: &'static str,
    min_len: usize,
    message: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        rule: Rule::Text {
            min_len,
            required: true,
        },
        message,
        hint: "",
    }
}

const fn optional(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        rule: Rule::Text {
            min_len: 0,
            required: false,
        },
        message: "",
        hint: "Optional",
    }
}

const fn with_hint(spec: FieldSpec, hint: &'static str) -> FieldSpec {
    FieldSpec { hint, ..spec }
}

const fn with_rule(spec: FieldSpec, rule: Rule) -> FieldSpec {
    FieldSpec { rule, ..spec }
}

const FIRST_NAME: FieldSpec = text(
    "firstName",
    "First Name",
    2,
    "First name must be at least 2 characters",
);
const LAST_NAME: FieldSpec = text(
    "lastName",
    "Last Name",
    2,
    "Last name must be at least 2 characters",
);
const DATE_OF_BIRTH: FieldSpec = with_hint(
    with_rule(
        text("dateOfBirth", "Date of Birth", 0, "Date of birth is required"),
        Rule::Date,
    ),
    "YYYY-MM-DD",
);
const GENDER: FieldSpec = with_hint(
    with_rule(
        text("gender", "Gender", 0, "Gender is required"),
        Rule::Choice { options: GENDERS },
    ),
    "Space or arrows to choose",
);

const REGISTRATION_FIELDS: &[FieldSpec] = &[
    FIRST_NAME,
    LAST_NAME,
    DATE_OF_BIRTH,
    GENDER,
    with_hint(optional("idNumber", "ID Number"), "National ID or passport (optional)"),
    with_hint(
        with_rule(
            text(
                "contactNumber",
                "Contact Number",
                0,
                "Contact number must be at least 10 digits",
            ),
            Rule::Phone { required: true },
        ),
        "e.g. +254 712 345678",
    ),
    optional("alternativeContact", "Alternative Contact"),
    with_hint(
        with_rule(
            text("email", "Email", 0, "Invalid email address"),
            Rule::Email,
        ),
        "Optional",
    ),
    text(
        "address",
        "Physical Address",
        5,
        "Address must be at least 5 characters",
    ),
    optional("occupation", "Occupation"),
    with_rule(
        text("maritalStatus", "Marital Status", 0, "Marital status is required"),
        Rule::Choice {
            options: MARITAL_STATUSES,
        },
    ),
    text(
        "emergencyContactName",
        "Emergency Contact Name",
        2,
        "Emergency contact name must be at least 2 characters",
    ),
    with_rule(
        text(
            "emergencyContactNumber",
            "Emergency Contact Number",
            0,
            "Emergency contact number must be at least 10 digits",
        ),
        Rule::Phone { required: true },
    ),
    text(
        "emergencyContactRelation",
        "Relation",
        2,
        "Relation must be at least 2 characters",
    ),
    optional("allergies", "Known Allergies"),
    optional("chronicConditions", "Chronic Conditions"),
    optional("currentMedications", "Current Medications"),
    with_hint(
        with_rule(
            text(
                "consentToContact",
                "Consent to Contact",
                0,
                "You must consent to be contacted",
            ),
            Rule::MustBeTrue,
        ),
        "Space to toggle",
    ),
    with_hint(
        with_rule(
            text(
                "consentToShareData",
                "Consent to Share Data",
                0,
                "You must consent to data sharing for treatment purposes",
            ),
            Rule::MustBeTrue,
        ),
        "Space to toggle",
    ),
];

const REGISTRATION_STEPS: &[StepDefinition] = &[
    StepDefinition::new(
        "personal",
        "Personal",
        &["firstName", "lastName", "dateOfBirth", "gender", "idNumber"],
    ),
    StepDefinition::new(
        "contact",
        "Contact",
        &["contactNumber", "alternativeContact", "email", "address"],
    ),
    StepDefinition::new(
        "additional",
        "Additional",
        &[
            "occupation",
            "maritalStatus",
            "emergencyContactName",
            "emergencyContactNumber",
            "emergencyContactRelation",
        ],
    ),
    StepDefinition::new(
        "medical",
        "Medical",
        &["allergies", "chronicConditions", "currentMedications"],
    ),
    StepDefinition::new(
        "consent",
        "Consent",
        &["consentToContact", "consentToShareData"],
    ),
];

pub static REGISTRATION: FormSchema = FormSchema {
    title: "Client Registration",
    fields: REGISTRATION_FIELDS,
    steps: REGISTRATION_STEPS,
    refinements: &[],
};

const ENROLLMENT_FIELDS: &[FieldSpec] = &[
    FIRST_NAME,
    LAST_NAME,
    DATE_OF_BIRTH,
    GENDER,
    with_hint(
        with_rule(
            text(
                "contactNumber",
                "Contact Number",
                0,
                "Contact number must be at least 10 digits",
            ),
            Rule::Phone { required: false },
        ),
        "Optional",
    ),
    with_hint(
        FieldSpec {
            rule: Rule::Text {
                min_len: 5,
                required: false,
            },
            ..text("address", "Address", 5, "Address must be at least 5 characters")
        },
        "Optional",
    ),
    with_hint(
        with_rule(
            text("programs", "Programs", 0, "Select at least one program"),
            Rule::Selection {
                options: PROGRAM_CATALOG,
                min: 1,
                max: Some(3),
            },
        ),
        "Space toggles the highlighted program, up to 3",
    ),
    with_hint(
        with_rule(
            text(
                "enrollmentDate",
                "Enrollment Period",
                0,
                "Enrollment date is required",
            ),
            Rule::DateRange,
        ),
        "YYYY-MM-DD to YYYY-MM-DD",
    ),
    optional("referralSource", "Referral Source"),
    optional("notes", "Notes"),
    with_hint(
        with_rule(
            text(
                "consentGiven",
                "Consent Given",
                0,
                "You must obtain client consent",
            ),
            Rule::MustBeTrue,
        ),
        "Space to toggle",
    ),
];

const ENROLLMENT_STEPS: &[StepDefinition] = &[StepDefinition::new(
    "enrollment",
    "Enrollment",
    &[
        "firstName",
        "lastName",
        "dateOfBirth",
        "gender",
        "contactNumber",
        "address",
        "programs",
        "enrollmentDate",
        "referralSource",
        "notes",
        "consentGiven",
    ],
)];

pub static ENROLLMENT: FormSchema = FormSchema {
    title: "Program Enrollment",
    fields: ENROLLMENT_FIELDS,
    steps: ENROLLMENT_STEPS,
    refinements: &[Refinement::RangeOrder {
        key: "enrollmentPeriod",
        field: "enrollmentDate",
        message: "Enrollment end date must be on or after the start date",
    }],
};

const HEALTH_PROGRAM_FIELDS: &[FieldSpec] = &[
    text(
        "title",
        "Program Title",
        5,
        "Title must be at least 5 characters",
    ),
    with_hint(
        with_rule(
            text("diseaseType", "Disease Type", 0, "Disease type is required"),
            Rule::Choice {
                options: DISEASE_TYPES,
            },
        ),
        "Space or arrows to choose",
    ),
    text(
        "description",
        "Description",
        20,
        "Description must be at least 20 characters",
    ),
    text(
        "goal",
        "Primary Goal",
        10,
        "Goal must be at least 10 characters",
    ),
    with_hint(
        with_rule(
            text(
                "objectives",
                "Objectives",
                0,
                "At least one objective is required",
            ),
            Rule::Items {
                min: 1,
                max: Some(3),
            },
        ),
        "Enter adds an objective, up to 3",
    ),
    text(
        "targetAudience",
        "Target Audience",
        5,
        "Target audience must be at least 5 characters",
    ),
    with_hint(
        with_rule(
            text(
                "activities",
                "Activities",
                0,
                "At least one activity is required",
            ),
            Rule::Activities {
                min: 1,
                max: Some(3),
            },
        ),
        "Type `name: description` and press Enter, up to 3",
    ),
    with_hint(
        with_rule(
            text("partners", "Partners", 0, ""),
            Rule::Items { min: 0, max: None },
        ),
        "Enter adds a partner (optional)",
    ),
    with_hint(
        with_rule(
            text("startDate", "Start Date", 0, "Start date is required"),
            Rule::Date,
        ),
        "YYYY-MM-DD",
    ),
    with_hint(
        with_rule(
            text("endDate", "End Date", 0, "End date is required"),
            Rule::Date,
        ),
        "YYYY-MM-DD",
    ),
];

const HEALTH_PROGRAM_STEPS: &[StepDefinition] = &[
    StepDefinition::new("basic", "Basics", &["title", "diseaseType", "description"]),
    StepDefinition::new("goals", "Goals", &["goal", "objectives"]),
    StepDefinition::new("target", "Target", &["targetAudience"]),
    StepDefinition::new("activities", "Activities", &["activities"]),
    StepDefinition::new("partners", "Partners", &["partners"]),
    StepDefinition::new("timeline", "Timeline", &["startDate", "endDate"]),
    StepDefinition::new("review", "Review", &[]),
];

pub static HEALTH_PROGRAM: FormSchema = FormSchema {
    title: "Create Health Program",
    fields: HEALTH_PROGRAM_FIELDS,
    steps: HEALTH_PROGRAM_STEPS,
    refinements: &[Refinement::DateOrder {
        key: "programTimeline",
        start: "startDate",
        end: "endDate",
        message: "End date must be on or after the start date",
    }],
};

/// The forms the application offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Registration,
    Enrollment,
    HealthProgram,
}

impl FormKind {
    pub fn schema(self) -> &'static FormSchema {
        match self {
            FormKind::Registration => &REGISTRATION,
            FormKind::Enrollment => &ENROLLMENT,
            FormKind::HealthProgram => &HEALTH_PROGRAM,
        }
    }

    /// Short name used in logs
    pub fn as_str(self) -> &'static str {
        match self {
            FormKind::Registration => "registration",
            FormKind::Enrollment => "enrollment",
            FormKind::HealthProgram => "health_program",
        }
    }

    /// Confirmation shown after a successful submission
    pub fn success_message(self) -> &'static str {
        match self {
            FormKind::Registration => "Client registered successfully!",
            FormKind::Enrollment => "Client enrolled successfully!",
            FormKind::HealthProgram => "Health program created successfully!",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ALL: [FormKind; 3] = [
        FormKind::Registration,
        FormKind::Enrollment,
        FormKind::HealthProgram,
    ];

    #[test]
    fn test_every_step_field_is_defined() {
        for kind in ALL {
            let schema = kind.schema();
            for step in schema.steps {
                for name in step.fields {
                    assert!(
                        schema.field(name).is_some(),
                        "{} step {} references undefined field {}",
                        kind.as_str(),
                        step.name,
                        name
                    );
                }
            }
        }
    }

    #[test]
    fn test_every_field_belongs_to_exactly_one_step() {
        for kind in ALL {
            let schema = kind.schema();
            for spec in schema.fields {
                let owners = schema.steps.iter().filter(|s| s.owns(spec.name)).count();
                assert_eq!(owners, 1, "{} field {}", kind.as_str(), spec.name);
            }
        }
    }

    #[test]
    fn test_refinements_land_on_a_single_step() {
        for kind in ALL {
            let schema = kind.schema();
            for refinement in schema.refinements {
                let owning = (0..schema.steps.len())
                    .filter(|i| schema.step_refinements(*i).any(|r| r == refinement))
                    .count();
                assert_eq!(owning, 1, "{}", refinement.key());
            }
        }
    }

    #[test]
    fn test_step_order() {
        let names = |kind: FormKind| -> Vec<&str> {
            kind.schema().steps.iter().map(|s| s.name).collect()
        };
        assert_eq!(
            names(FormKind::Registration),
            vec!["personal", "contact", "additional", "medical", "consent"]
        );
        assert_eq!(names(FormKind::Enrollment), vec!["enrollment"]);
        assert_eq!(
            names(FormKind::HealthProgram),
            vec!["basic", "goals", "target", "activities", "partners", "timeline", "review"]
        );
    }

    #[test]
    fn test_program_options_carry_disease_type() {
        let programs = ENROLLMENT.field("programs").unwrap();
        assert_eq!(programs.options().len(), 5);
        assert_eq!(programs.options()[1], ("2", "Malaria-Free Communities"));
        assert_eq!(programs.option_detail("2"), Some("malaria"));
        assert_eq!(programs.option_detail("9"), None);
    }

    #[test]
    fn test_review_step_is_summary() {
        let last = HEALTH_PROGRAM.steps.last().unwrap();
        assert!(last.is_summary());
    }
}
