use crate::flow::constants::{script, tools as tool_names};
use crate::flow::{FlowNode, NodeKind, SchedulingProvider};
use crate::utils::non_blank;

use super::providers::{scheduling_tool_name, ProviderKind, SchedulingAction};

/// 单个节点的编译产物
pub(super) struct Instruction {
    pub lines: Vec<String>,
    pub provider: Option<ProviderKind>,
}

impl Instruction {
    fn step(position: usize, text: String) -> Self {
        Self {
            lines: vec![format!("{position}. {text}")],
            provider: None,
        }
    }

    fn sub(mut self, text: impl AsRef<str>) -> Self {
        self.lines.push(format!("{}{}", script::SUB_ITEM, text.as_ref()));
        self
    }

    fn requires(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }
}

/// 作者文本压成单行，避免破坏编号结构
fn inline(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 作者的开场白放在第一条子说明
fn lead_in(mut instruction: Instruction, text: Option<&str>) -> Instruction {
    if let Some(text) = non_blank(text) {
        let line = format!("{}Before you start, say: \"{}\"", script::SUB_ITEM, inline(text));
        instruction.lines.insert(1, line);
    }
    instruction
}

pub(super) fn render(position: usize, node: &FlowNode, tool_name: Option<&str>) -> Instruction {
    match &node.kind {
        NodeKind::Message { text } => match non_blank(text.as_deref()) {
            Some(text) => Instruction::step(position, format!("Say: \"{}\"", inline(text))),
            None => Instruction::step(position, script::DEFAULT_MESSAGE.to_string()),
        },
        NodeKind::Question { text, options } => {
            let step = match non_blank(text.as_deref()) {
                Some(text) => Instruction::step(position, format!("Ask: \"{}\"", inline(text))),
                None => Instruction::step(position, script::DEFAULT_QUESTION.to_string()),
            };
            if options.is_empty() {
                step.sub(script::LISTEN_AND_CONTINUE)
            } else {
                options.iter().fold(step, |step, option| {
                    step.sub(format!(
                        "If the caller answers \"{}\", acknowledge their choice and continue.",
                        inline(&option.label)
                    ))
                })
            }
        }
        NodeKind::Condition { condition, .. } => {
            let condition = non_blank(condition.as_deref())
                .map(inline)
                .unwrap_or_else(|| script::DEFAULT_CONDITION.to_string());
            Instruction::step(position, format!("Determine: {condition}"))
                .sub(script::CONDITION_YES)
                .sub(script::CONDITION_NO)
        }
        NodeKind::Transfer { text, .. } => match tool_name {
            Some(tool) => {
                let announce = match non_blank(text.as_deref()) {
                    Some(text) => format!("say \"{}\"", inline(text)),
                    None => "let the caller know you are connecting them".to_string(),
                };
                Instruction::step(
                    position,
                    format!(
                        "Transfer the call: {announce}, then use the {tool} tool to transfer them."
                    ),
                )
            }
            None => Instruction::step(position, script::GENERIC_TRANSFER.to_string()),
        },
        NodeKind::End { text } => match non_blank(text.as_deref()) {
            Some(text) => {
                Instruction::step(position, format!("End the call: \"{}\"", inline(text)))
            }
            None => Instruction::step(position, script::DEFAULT_CLOSING.to_string()),
        },
        NodeKind::CheckAvailability { provider, text } => {
            let provider = provider.unwrap_or_default();
            let tool = scheduling_tool_name(provider, SchedulingAction::CheckAvailability);
            let step = Instruction::step(
                position,
                format!(
                    "Check availability: use the {tool} tool to find open time slots, then share the available options with the caller."
                ),
            );
            lead_in(step, text.as_deref()).requires(scheduling_provider(provider))
        }
        NodeKind::BookAppointment { provider, text } => {
            let provider = provider.unwrap_or_default();
            let tool = scheduling_tool_name(provider, SchedulingAction::BookAppointment);
            let step = Instruction::step(
                position,
                format!(
                    "Book the appointment: confirm the caller's name, email, and preferred time, use the {tool} tool to book it, then read the confirmed details back to the caller."
                ),
            );
            lead_in(step, text.as_deref()).requires(scheduling_provider(provider))
        }
        NodeKind::CrmLookup { text } => {
            let step = Instruction::step(
                position,
                format!(
                    "Look up the caller: use the {} tool with the caller's phone number.",
                    tool_names::CRM_LOOKUP
                ),
            )
            .sub("If a record is found, greet them by name and reference their history with the business.")
            .sub("If no record is found, treat them as a new contact and welcome them warmly.");
            lead_in(step, text.as_deref()).requires(ProviderKind::Crm)
        }
        NodeKind::Webhook { .. } => match tool_name {
            Some(tool) => Instruction::step(
                position,
                format!(
                    "Collect the caller's name, phone number, email, and any notes, then use the {tool} tool to submit them."
                ),
            ),
            None => Instruction::step(position, script::WEBHOOK_COLLECT_ONLY.to_string()),
        },
    }
}

fn scheduling_provider(provider: SchedulingProvider) -> ProviderKind {
    ProviderKind::from(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_text_stays_on_its_step() {
        let node = FlowNode::message("m", "Hello\n2. not a step");
        let rendered = render(1, &node, None);
        assert_eq!(rendered.lines, vec!["1. Say: \"Hello 2. not a step\"".to_string()]);
    }

    #[test]
    fn transfer_uses_assigned_tool_name() {
        let node = FlowNode::transfer("t", Some("+15550000000"));
        let rendered = render(3, &node, Some("transfer_call_1"));
        assert!(rendered.lines[0].starts_with("3. Transfer the call"));
        assert!(rendered.lines[0].contains("transfer_call_1"));
        assert!(rendered.provider.is_none());
    }

    #[test]
    fn scheduling_without_provider_defaults_to_calcom() {
        let node = FlowNode::check_availability("c", None);
        let rendered = render(1, &node, None);
        assert_eq!(rendered.provider, Some(ProviderKind::Calcom));
    }

    #[test]
    fn lead_in_comes_before_other_guidance() {
        let mut node = FlowNode::crm_lookup("c");
        node.kind = NodeKind::CrmLookup {
            text: Some("One moment while I pull up your account.".into()),
        };
        let rendered = render(1, &node, None);
        assert_eq!(rendered.lines.len(), 4);
        assert!(rendered.lines[0].starts_with("1. Look up the caller"));
        assert_eq!(
            rendered.lines[1],
            format!(
                "{}Before you start, say: \"One moment while I pull up your account.\"",
                script::SUB_ITEM
            )
        );
        let found = format!("{}If a record is found", script::SUB_ITEM);
        let not_found = format!("{}If no record is found", script::SUB_ITEM);
        assert!(rendered.lines[2].starts_with(&found));
        assert!(rendered.lines[3].starts_with(&not_found));
    }

    #[test]
    fn scheduling_lead_in_follows_the_step() {
        let node = FlowNode::new(
            "b",
            NodeKind::BookAppointment {
                provider: Some(SchedulingProvider::GoogleCalendar),
                text: Some("Let's get you booked.".into()),
            },
        );
        let rendered = render(2, &node, None);
        assert_eq!(rendered.lines.len(), 2);
        assert!(rendered.lines[0].contains("book_calendar_appointment"));
        assert!(rendered.lines[1].contains("Let's get you booked."));
    }
}
