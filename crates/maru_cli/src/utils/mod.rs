pub mod tool_locator;
