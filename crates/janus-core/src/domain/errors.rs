use std::error::Error;
use std::fmt::{Display, Formatter};

pub type JanusResult<T> = Result<T, JanusError>;
pub type ParserResult<T> = JanusResult<T>;
pub type ComputeResult<T> = JanusResult<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JanusErrorCategory {
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl JanusErrorCategory {
    pub const fn exit_status(self) -> ExitStatus {
        match self {
            Self::InputValidationError => ExitStatus {
                exit_code: 2,
                category_name: "InputValidationError",
            },
            Self::IoSystemError => ExitStatus {
                exit_code: 3,
                category_name: "IoSystemError",
            },
            Self::ComputationError => ExitStatus {
                exit_code: 4,
                category_name: "ComputationError",
            },
            Self::InternalError => ExitStatus {
                exit_code: 5,
                category_name: "InternalError",
            },
        }
    }

    pub const fn exit_code(self) -> i32 {
        self.exit_status().exit_code
    }

    pub const fn category_name(self) -> &'static str {
        self.exit_status().category_name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    pub exit_code: i32,
    pub category_name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JanusError {
    category: JanusErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl JanusError {
    pub fn new(
        category: JanusErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            JanusErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(JanusErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn computation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(JanusErrorCategory::ComputationError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(JanusErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> JanusErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for JanusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.category_name(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for JanusError {}
