#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    Pan,
    Create,
    #[default]
    Select,
    Connect,
    ConnectDashed,
    Delete,
    Paint,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::Pan,
        Tool::Create,
        Tool::Select,
        Tool::Connect,
        Tool::ConnectDashed,
        Tool::Delete,
        Tool::Paint,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Pan => "Pan",
            Tool::Create => "Create",
            Tool::Select => "Select",
            Tool::Connect => "Connect",
            Tool::ConnectDashed => "Connect (dashed)",
            Tool::Delete => "Delete",
            Tool::Paint => "Paint",
        }
    }

    pub fn shortcut(self) -> &'static str {
        match self {
            Tool::Pan => "H",
            Tool::Create => "N",
            Tool::Select => "V",
            Tool::Connect => "C",
            Tool::ConnectDashed => "⇧C",
            Tool::Delete => "D",
            Tool::Paint => "P",
        }
    }

    pub fn is_connect(self) -> bool {
        matches!(self, Tool::Connect | Tool::ConnectDashed)
    }
}
