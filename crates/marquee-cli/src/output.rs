//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use marquee_core::sections::{Project, SectionInfo, SectionKind, Testimonial};
use serde_json::Value;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a confirmation message (suppressed in quiet mode)
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", message),
            OutputFormat::Json | OutputFormat::Quiet => {}
        }
    }

    /// Print an identifier (always printed, even in quiet mode)
    pub fn id(&self, id: &str) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::json!({ "id": id })),
            OutputFormat::Human | OutputFormat::Quiet => println!("{}", id),
        }
    }

    /// Print a JSON value
    pub fn value(&self, value: &Value) {
        match self.format {
            OutputFormat::Quiet => {}
            _ => match serde_json::to_string_pretty(value) {
                Ok(json) => println!("{}", json),
                Err(_) => println!("{}", value),
            },
        }
    }

    /// Print the section registry
    pub fn section_table(&self, sections: &[SectionInfo]) {
        match self.format {
            OutputFormat::Json => {
                let rows: Vec<Value> = sections
                    .iter()
                    .map(|info| {
                        serde_json::json!({
                            "name": info.name,
                            "collection": info.collection,
                            "kind": kind_label(info.kind),
                        })
                    })
                    .collect();
                self.value(&Value::Array(rows));
            }
            OutputFormat::Human => {
                for info in sections {
                    println!("{:<14} {:<18} {}", info.name, info.collection, kind_label(info.kind));
                }
            }
            OutputFormat::Quiet => {
                for info in sections {
                    println!("{}", info.name);
                }
            }
        }
    }

    /// Print one project per line
    pub fn project_list(&self, projects: &[Project]) {
        match self.format {
            OutputFormat::Json => {
                self.value(&serde_json::to_value(projects).unwrap_or(Value::Null));
            }
            OutputFormat::Human => {
                for project in projects {
                    println!("[{}] {}  {}", project.order, project.id, project.title);
                }
            }
            OutputFormat::Quiet => {
                for project in projects {
                    println!("{}", project.id);
                }
            }
        }
    }

    /// Print one testimonial per line
    pub fn testimonial_list(&self, testimonials: &[Testimonial]) {
        match self.format {
            OutputFormat::Json => {
                self.value(&serde_json::to_value(testimonials).unwrap_or(Value::Null));
            }
            OutputFormat::Human => {
                for t in testimonials {
                    println!("[{}] {}  {}: {}", t.order, t.id, t.author, truncate(&t.quote, 50));
                }
            }
            OutputFormat::Quiet => {
                for t in testimonials {
                    println!("{}", t.id);
                }
            }
        }
    }
}

fn kind_label(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::Singleton => "singleton",
        SectionKind::Collection => "collection",
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head.trim_end())
    }
}
