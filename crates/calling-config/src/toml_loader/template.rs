//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# calling configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[session]
# model = "gpt-3.5-turbo-16k"
# system_prompt = "You are a helpful assistant. ..."
# max_function_rounds = 8   # 1-1000, unset = no cap

[session.extra]
# Merged into every request body. model, messages, functions and
# function_call are managed by the session and may not appear here.
# temperature = 0.2

[logging]
# level = "info"            # debug, info, warn, error
"##
    .to_string()
}
