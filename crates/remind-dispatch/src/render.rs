//! Fixed rendering of a reminder into the outbound message.
//!
//! The channel speaks Telegram HTML, so the user text is escaped before it
//! is wrapped in the bell-prefixed template.

/// Escape the characters Telegram's HTML parse mode treats specially.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the message body sent for a due reminder.
pub fn render_message(text: &str) -> String {
    format!("🔔 <b>Reminder</b>\n\n{}", escape_html(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bell_prefix() {
        let msg = render_message("water the plants");
        assert!(msg.starts_with("🔔 <b>Reminder</b>\n\n"));
        assert!(msg.ends_with("water the plants"));
    }

    #[test]
    fn escapes_html_specials() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(escape_html("hello world 123"), "hello world 123");
    }
}
