use pdf_script_macro::script_enum;

pub use pattern::{ColorStop, Pattern, PatternKind};

mod pattern;

/// The kind of external file a `# resource` declaration points at
#[script_enum(Name)]
pub enum ResourceKind {
    Image = "Image",
    Font = "Font",
}
