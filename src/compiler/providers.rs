use serde::{Deserialize, Serialize};

use crate::flow::constants::tools as tool_names;
use crate::flow::SchedulingProvider;

/// 需要展开工具模板的集成类别
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Calcom,
    GoogleCalendar,
    Crm,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Calcom => "calcom",
            ProviderKind::GoogleCalendar => "google_calendar",
            ProviderKind::Crm => "crm",
        }
    }
}

impl From<SchedulingProvider> for ProviderKind {
    fn from(provider: SchedulingProvider) -> Self {
        match provider {
            SchedulingProvider::Calcom => ProviderKind::Calcom,
            SchedulingProvider::GoogleCalendar => ProviderKind::GoogleCalendar,
        }
    }
}

/// 调度节点的两种动作
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulingAction {
    CheckAvailability,
    BookAppointment,
}

pub fn scheduling_tool_name(
    provider: SchedulingProvider,
    action: SchedulingAction,
) -> &'static str {
    match (provider, action) {
        (SchedulingProvider::Calcom, SchedulingAction::CheckAvailability) => {
            tool_names::CALCOM_CHECK_AVAILABILITY
        }
        (SchedulingProvider::Calcom, SchedulingAction::BookAppointment) => {
            tool_names::CALCOM_BOOK_APPOINTMENT
        }
        (SchedulingProvider::GoogleCalendar, SchedulingAction::CheckAvailability) => {
            tool_names::GOOGLE_CHECK_AVAILABILITY
        }
        (SchedulingProvider::GoogleCalendar, SchedulingAction::BookAppointment) => {
            tool_names::GOOGLE_BOOK_APPOINTMENT
        }
    }
}

/// 按首次出现顺序去重的 provider 集合
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProviderSet(Vec<ProviderKind>);

impl ProviderSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// 已存在时返回 false
    pub fn insert(&mut self, provider: ProviderKind) -> bool {
        if self.0.contains(&provider) {
            return false;
        }
        self.0.push(provider);
        true
    }

    pub fn contains(&self, provider: ProviderKind) -> bool {
        self.0.contains(&provider)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ProviderKind> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ProviderKind> for ProviderSet {
    fn from_iter<I: IntoIterator<Item = ProviderKind>>(iter: I) -> Self {
        let mut set = ProviderSet::new();
        for provider in iter {
            set.insert(provider);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_set_keeps_first_occurrence_order() {
        let set: ProviderSet = [
            ProviderKind::Crm,
            ProviderKind::Calcom,
            ProviderKind::Crm,
            ProviderKind::GoogleCalendar,
        ]
        .into_iter()
        .collect();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![
                ProviderKind::Crm,
                ProviderKind::Calcom,
                ProviderKind::GoogleCalendar
            ]
        );
    }

    #[test]
    fn providers_have_distinct_tool_names() {
        let calcom = scheduling_tool_name(
            SchedulingProvider::Calcom,
            SchedulingAction::CheckAvailability,
        );
        let google = scheduling_tool_name(
            SchedulingProvider::GoogleCalendar,
            SchedulingAction::CheckAvailability,
        );
        assert_ne!(calcom, google);
    }
}
