use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::json;

use super::descriptor::{ParameterSchema, ToolDescriptor};
use crate::compiler::ProviderKind;
use crate::flow::constants::tools as tool_names;

const WORKING_ON_IT: &str = "Let the caller know you're working on it.";

/// 每个 provider 固定展开的工具模板；`url` 是相对集成后端的路径，绑定时补全
static PROVIDER_TEMPLATES: Lazy<HashMap<ProviderKind, Vec<ToolDescriptor>>> = Lazy::new(|| {
    HashMap::from([
        (
            ProviderKind::Calcom,
            vec![
                custom(tool_names::CALCOM_CHECK_AVAILABILITY, "/tools/calcom/availability")
                    .description("Check open appointment slots on the Cal.com calendar.")
                    .parameters(availability_schema())
                    .build(),
                custom(tool_names::CALCOM_BOOK_APPOINTMENT, "/tools/calcom/book")
                    .description("Book an appointment on the Cal.com calendar.")
                    .parameters(booking_schema())
                    .build(),
            ],
        ),
        (
            ProviderKind::GoogleCalendar,
            vec![
                custom(
                    tool_names::GOOGLE_CHECK_AVAILABILITY,
                    "/tools/google-calendar/availability",
                )
                .description("Check free time on the connected Google Calendar.")
                .parameters(availability_schema())
                .build(),
                custom(tool_names::GOOGLE_BOOK_APPOINTMENT, "/tools/google-calendar/book")
                    .description("Create an event on the connected Google Calendar.")
                    .parameters(booking_schema())
                    .build(),
            ],
        ),
        (
            ProviderKind::Crm,
            vec![custom(tool_names::CRM_LOOKUP, "/tools/crm/lookup")
                .description("Look up the caller in the connected CRM by phone number.")
                .parameters(ParameterSchema::object().required_property(
                    "phone_number",
                    "string",
                    "The caller's phone number",
                ))
                .build()],
        ),
    ])
});

pub fn provider_templates(provider: ProviderKind) -> &'static [ToolDescriptor] {
    PROVIDER_TEMPLATES
        .get(&provider)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn custom(name: &str, path: &str) -> super::descriptor::ToolDescriptorBuilder {
    ToolDescriptor::builder(tool_names::KIND_CUSTOM, name)
        .field("url", json!(path))
        .field("method", json!("POST"))
        .speaks_while_working(WORKING_ON_IT)
}

fn availability_schema() -> ParameterSchema {
    ParameterSchema::object()
        .required_property("start_date", "string", "First day to search, ISO 8601 date")
        .property("end_date", "string", "Last day to search, ISO 8601 date")
        .property("timezone", "string", "IANA timezone of the caller")
}

fn booking_schema() -> ParameterSchema {
    ParameterSchema::object()
        .required_property("name", "string", "The caller's full name")
        .required_property("email", "string", "The caller's email address")
        .required_property("start_time", "string", "Chosen slot start, ISO 8601 date-time")
        .property("timezone", "string", "IANA timezone of the caller")
        .property("notes", "string", "Anything the host should know")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduling_providers_contribute_two_tools() {
        assert_eq!(provider_templates(ProviderKind::Calcom).len(), 2);
        assert_eq!(provider_templates(ProviderKind::GoogleCalendar).len(), 2);
        assert_eq!(provider_templates(ProviderKind::Crm).len(), 1);
    }

    #[test]
    fn template_names_match_compiler_references() {
        let names: Vec<&str> = provider_templates(ProviderKind::GoogleCalendar)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                tool_names::GOOGLE_CHECK_AVAILABILITY,
                tool_names::GOOGLE_BOOK_APPOINTMENT
            ]
        );
    }
}
