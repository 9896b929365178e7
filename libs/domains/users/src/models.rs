use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Rule table: (field, rule code, message), in field declaration order.
///
/// `required` is checked here; other codes come from the `Validate` derive.
/// A failed `required` rule hides the remaining rules of the same field.
const RULES: &[(&str, &str, &str)] = &[
    ("name", "required", "Name is required"),
    ("name", "length", "Name must be between 2 and 50 characters"),
    ("email", "required", "Email is required"),
    ("email", "email", "Email address is not valid"),
    ("password", "required", "Password is required"),
    ("password", "length", "Password must be at least 6 characters"),
    (
        "password",
        "password_complexity",
        "Password must contain at least one uppercase letter, one lowercase letter and one digit",
    ),
    ("age", "range", "Age must be between 18 and 120"),
];

fn password_complexity(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_upper && has_lower && has_digit) {
        return Err(ValidationError::new("password_complexity"));
    }
    Ok(())
}

/// Candidate user, as entered by the caller (no id yet)
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewUser {
    #[validate(length(min = 2, max = 50))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6), custom(function = "password_complexity"))]
    pub password: String,
    #[validate(range(min = 18, max = 120))]
    pub age: i32,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        age: i32,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            age,
        }
    }

    /// Evaluate every field rule and return all violation messages.
    ///
    /// Empty when the candidate is valid. Messages follow field declaration
    /// order (name, email, password, age).
    pub fn violations(&self) -> Vec<String> {
        let errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        let field_errors = errors.field_errors();
        let mut messages = Vec::new();

        for (field, code, message) in RULES {
            let blank = self.is_blank(field);
            let failed = if *code == "required" {
                blank
            } else {
                !blank
                    && field_errors
                        .get(*field)
                        .is_some_and(|failures| failures.iter().any(|e| e.code == *code))
            };
            if failed {
                messages.push((*message).to_string());
            }
        }

        messages
    }

    fn is_blank(&self, field: &str) -> bool {
        match field {
            "name" => self.name.trim().is_empty(),
            "email" => self.email.trim().is_empty(),
            "password" => self.password.trim().is_empty(),
            _ => false,
        }
    }

    pub(crate) fn into_user(self, id: u32) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            age: self.age,
        }
    }
}

/// Stored user; the id is fixed at construction by the manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: u32,
    pub name: String,
    pub email: String,
    /// Plain text; this registry never leaves process memory
    pub password: String,
    pub age: i32,
}

impl User {
    pub fn id(&self) -> u32 {
        self.id
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Email: {}, Age: {}",
            self.id, self.name, self.email, self.age
        )
    }
}

/// Listing projection (without password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub age: i32,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            age: user.age,
        }
    }
}
