use nu_ansi_term::Color::Cyan;

/// Print info on console.
pub fn info(message: &str) {
    println!("{}", Cyan.bold().italic().paint(message));
}

/// Print a plain line on console, e.g. a message which embeds highlighted values.
pub fn print(message: &str) {
    println!("{message}");
}

/// Render a value in the emphasis colour, so that it stands out in a console message.
pub fn highlight<T>(value: T) -> String
where
    T: AsRef<str>,
{
    Cyan.paint(value.as_ref()).to_string()
}

#[cfg(test)]
mod tests {
    use super::highlight;

    #[test]
    fn test_highlight() {
        let painted = highlight("jx-staging");
        assert!(painted.contains("jx-staging"));
        assert!(painted.starts_with("\u{1b}["));
        assert_ne!(painted, "jx-staging");
    }
}
