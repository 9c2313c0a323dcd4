use mtasnap_core::window::WindowSnapshot;

pub fn print_windows_table(windows: &[WindowSnapshot]) {
    let formatter = TableFormatter::new(windows);
    formatter.print_table(windows);
}

struct TableFormatter {
    title_width: usize,
    pid_width: usize,
    visible_width: usize,
    minimized_width: usize,
}

impl TableFormatter {
    fn new(windows: &[WindowSnapshot]) -> Self {
        let title_width = windows
            .iter()
            .map(|w| w.title.chars().count())
            .max()
            .unwrap_or(20)
            .clamp(5, 60); // Between "Title" header min and reasonable terminal width max

        Self {
            title_width,
            pid_width: 7,
            visible_width: 7,
            minimized_width: 9,
        }
    }

    fn print_table(&self, windows: &[WindowSnapshot]) {
        println!("{}", self.border('┌', '┬', '┐'));
        println!("{}", self.row("Title", "PID", "Visible", "Minimized"));
        println!("{}", self.border('├', '┼', '┤'));
        for window in windows {
            println!(
                "{}",
                self.row(
                    &window.title,
                    &window.pid.to_string(),
                    yes_no(window.is_visible),
                    yes_no(window.is_minimized),
                )
            );
        }
        println!("{}", self.border('└', '┴', '┘'));
    }

    fn row(&self, title: &str, pid: &str, visible: &str, minimized: &str) -> String {
        format!(
            "│ {} │ {} │ {} │ {} │",
            truncate(title, self.title_width),
            truncate(pid, self.pid_width),
            truncate(visible, self.visible_width),
            truncate(minimized, self.minimized_width),
        )
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        format!(
            "{left}{}{mid}{}{mid}{}{mid}{}{right}",
            "─".repeat(self.title_width + 2),
            "─".repeat(self.pid_width + 2),
            "─".repeat(self.visible_width + 2),
            "─".repeat(self.minimized_width + 2),
        )
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 titles.
fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_pads_short_strings() {
        assert_eq!(truncate("abc", 5), "abc  ");
    }

    #[test]
    fn test_truncate_shortens_long_strings() {
        assert_eq!(truncate("abcdefgh", 6), "abc...");
    }

    #[test]
    fn test_truncate_handles_multibyte_titles() {
        // Must not panic on non-ASCII boundaries
        let result = truncate("MTA: Сан Андреас клиент окно", 10);
        assert_eq!(result.chars().count(), 10);
    }

    #[test]
    fn test_formatter_clamps_title_width() {
        let windows = vec![WindowSnapshot {
            handle: mtasnap_core::window::WindowHandle(1),
            title: "x".repeat(200),
            pid: 1,
            is_visible: true,
            is_minimized: false,
        }];

        let formatter = TableFormatter::new(&windows);
        assert_eq!(formatter.title_width, 60);
    }

    #[test]
    fn test_formatter_defaults_for_empty_list() {
        let formatter = TableFormatter::new(&[]);
        assert_eq!(formatter.title_width, 20);
    }
}
