/// Greeting shown to a Discord user.
pub fn greet_user(name: &str) -> String {
    format!("Hello, **{name}**!")
}
