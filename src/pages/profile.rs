use super::Outcome;
use crate::client::models::Profile;
use crate::client::HrClient;
use crate::view::format::{
    capitalize_first, long_date, name_initials, number, or_fallback, parse_loose_date,
};
use crate::view::Field;

const NOT_PROVIDED: &str = "Not provided";
const NOT_AVAILABLE: &str = "Not available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub initials: String,
    pub name: String,
    pub role: String,
    pub status: &'static str,
    pub personal: Vec<Field>,
    pub employment: Vec<Field>,
}

impl ProfileView {
    pub fn new(profile: &Profile) -> Self {
        let role = profile
            .role
            .as_deref()
            .map(capitalize_first)
            .unwrap_or_default();
        let date = |value: Option<&str>| {
            value
                .and_then(parse_loose_date)
                .map(long_date)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };

        Self {
            initials: name_initials(profile.first_name.as_deref(), profile.last_name.as_deref()),
            name: format!(
                "{} {}",
                profile.first_name.as_deref().unwrap_or_default(),
                profile.last_name.as_deref().unwrap_or_default()
            )
            .trim()
            .to_string(),
            status: if profile.is_active { "Active" } else { "Inactive" },
            personal: vec![
                Field::new(
                    "Employee ID",
                    or_fallback(profile.employee_id.as_deref(), NOT_PROVIDED),
                ),
                Field::new("Email", or_fallback(profile.email.as_deref(), NOT_PROVIDED)),
                Field::new("Phone", or_fallback(profile.phone.as_deref(), NOT_PROVIDED)),
                Field::new("Address", or_fallback(profile.address.as_deref(), NOT_PROVIDED)),
            ],
            employment: vec![
                Field::new("Role", or_fallback(Some(role.as_str()), "Not specified")),
                Field::new(
                    "Salary",
                    match profile.salary {
                        Some(salary) if salary != 0.0 => format!("${}", number(salary)),
                        _ => "Not disclosed".to_string(),
                    },
                ),
                Field::new("Member Since", date(profile.created_at.as_deref())),
                Field::new("Last Updated", date(profile.updated_at.as_deref())),
            ],
            role,
        }
    }
}

pub async fn view_profile(client: &HrClient) -> Outcome<ProfileView> {
    let profile = load!(client.employee_profile(), "Failed to load profile");
    Outcome::Render(ProfileView::new(&profile))
}
