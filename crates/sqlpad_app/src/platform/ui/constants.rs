pub const TITLE: &str = "SQL Parser";
pub const PLACEHOLDER: &str = "Enter SQL query...";
pub const RESULT_HEADING: &str = "Result:";
pub const WAITING_LABEL: &str = "(waiting for response)";

pub const CMD_PARSE: &str = "/parse";
pub const CMD_CLEAR: &str = "/clear";
pub const CMD_SHOW: &str = "/show";
pub const CMD_QUIT: &str = "/quit";
