/// 编译与工具解析共用的常量
///
/// 统一管理脚本文案、工具名前缀等硬编码字符串

/// 指令脚本文案
pub mod script {
    pub const FLOW_HEADER: &str = "## Conversation Flow";
    pub const FLOW_INTRO: &str = "Follow these steps in order:";
    pub const GUIDELINES_HEADER: &str = "## Guidelines";

    /// 子说明行的缩进，保证不会被当成编号行
    pub const SUB_ITEM: &str = "   - ";

    pub const GUIDELINES: &[&str] = &[
        "Keep your responses concise and conversational.",
        "If the caller goes off-script, answer briefly and gently guide them back to the current step.",
        "Be empathetic and patient, especially when the caller is frustrated or confused.",
        "If the caller asks to speak with a human, offer to connect them with a team member.",
        "Whenever you use a tool, let the caller know you're working on it.",
    ];

    pub const DEFAULT_MESSAGE: &str = "Share a brief, relevant message with the caller.";
    pub const DEFAULT_QUESTION: &str = "Ask the caller a relevant question.";
    pub const LISTEN_AND_CONTINUE: &str = "Listen to the caller's answer, then continue.";
    pub const DEFAULT_CONDITION: &str = "whether the caller's situation matches what this step expects";
    pub const CONDITION_YES: &str = "If yes, continue with the next step.";
    pub const CONDITION_NO: &str = "If no, acknowledge it and adapt the conversation before continuing.";
    pub const GENERIC_TRANSFER: &str =
        "If the caller needs further help, offer to transfer them to a team member.";
    pub const DEFAULT_CLOSING: &str = "Thank the caller for their time and end the call politely.";
    pub const WEBHOOK_COLLECT_ONLY: &str =
        "Collect the caller's name, phone number, email, and any notes about their request.";
}

/// 工具名
pub mod tools {
    pub const WEBHOOK_PREFIX: &str = "flow_webhook_";
    pub const TRANSFER_PREFIX: &str = "transfer_call_";

    pub const CALCOM_CHECK_AVAILABILITY: &str = "check_availability_calcom";
    pub const CALCOM_BOOK_APPOINTMENT: &str = "book_appointment_calcom";
    pub const GOOGLE_CHECK_AVAILABILITY: &str = "check_calendar_availability";
    pub const GOOGLE_BOOK_APPOINTMENT: &str = "book_calendar_appointment";
    pub const CRM_LOOKUP: &str = "lookup_crm_contact";

    /// 远端工具类型
    pub const KIND_CUSTOM: &str = "custom";
    pub const KIND_TRANSFER_CALL: &str = "transfer_call";
}

/// webhook 工具的参数字段
pub mod fields {
    pub const CALLER_NAME: &str = "caller_name";
    pub const CALLER_PHONE: &str = "caller_phone";
    pub const CALLER_EMAIL: &str = "caller_email";
    pub const NOTES: &str = "notes";
    pub const CLIENT_ID: &str = "client_id";
}
