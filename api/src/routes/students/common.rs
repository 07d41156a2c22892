use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudentRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "Roll number is required"))]
    pub roll_no: String,

    #[validate(length(min = 1, message = "Class is required"))]
    pub class_name: String,

    #[validate(email(message = "Invalid student email format"))]
    pub student_email: String,

    #[validate(email(message = "Invalid parent email format"))]
    pub parent_email: String,
}

/// Editable roster fields; the roll number is fixed at creation.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStudentRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, message = "Class is required"))]
    pub class_name: String,

    #[validate(email(message = "Invalid student email format"))]
    pub student_email: String,

    #[validate(email(message = "Invalid parent email format"))]
    pub parent_email: String,
}
