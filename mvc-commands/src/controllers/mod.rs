/// Greeting controller shared by the prefix and slash `hello` commands.
pub mod greet;
