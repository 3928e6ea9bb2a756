//! Console output.
//!
//! Handlers write through the [`Output`] trait so they can be tested against
//! a buffer instead of the terminal.

use console::style;

/// Output sink for command handlers.
pub trait Output {
    fn println(&self, text: &str);
    fn print(&self, text: &str);
    fn newline(&self);
    fn header(&self, text: &str);
    fn subheader(&self, text: &str);
    fn indented(&self, text: &str);
    fn success(&self, text: &str);
    fn warning(&self, text: &str);
    fn error(&self, text: &str);
}

/// Styled terminal output.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for ConsoleOutput {
    fn println(&self, text: &str) {
        println!("{}", text);
    }

    fn print(&self, text: &str) {
        print!("{}", text);
    }

    fn newline(&self) {
        println!();
    }

    fn header(&self, text: &str) {
        println!("{}", style(text).bold());
        println!("{}", "=".repeat(text.chars().count()));
    }

    fn subheader(&self, text: &str) {
        println!();
        println!("{}", style(text).bold().underlined());
    }

    fn indented(&self, text: &str) {
        println!("  {}", text);
    }

    fn success(&self, text: &str) {
        println!("{} {}", style("✓").green(), text);
    }

    fn warning(&self, text: &str) {
        eprintln!("{} {}", style("warning:").yellow().bold(), text);
    }

    fn error(&self, text: &str) {
        eprintln!("{} {}", style("error:").red().bold(), text);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Output;
    use std::cell::RefCell;

    /// Collects output lines for assertions.
    #[derive(Debug, Default)]
    pub struct BufferOutput {
        pub lines: RefCell<Vec<String>>,
    }

    impl BufferOutput {
        pub fn text(&self) -> String {
            self.lines.borrow().join("\n")
        }

        fn push(&self, line: String) {
            self.lines.borrow_mut().push(line);
        }
    }

    impl Output for BufferOutput {
        fn println(&self, text: &str) {
            self.push(text.to_string());
        }
        fn print(&self, text: &str) {
            self.push(text.to_string());
        }
        fn newline(&self) {
            self.push(String::new());
        }
        fn header(&self, text: &str) {
            self.push(format!("# {}", text));
        }
        fn subheader(&self, text: &str) {
            self.push(format!("## {}", text));
        }
        fn indented(&self, text: &str) {
            self.push(format!("  {}", text));
        }
        fn success(&self, text: &str) {
            self.push(format!("ok: {}", text));
        }
        fn warning(&self, text: &str) {
            self.push(format!("warning: {}", text));
        }
        fn error(&self, text: &str) {
            self.push(format!("error: {}", text));
        }
    }
}
