pub struct Icons;

impl Icons {
    pub const TREE: &str = "🌳";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const FILE: &str = "📄";
    pub const FOLDER: &str = "📁";
    pub const FRAME: &str = "🔲";
    pub const TABLE: &str = "📋";
    pub const LIST: &str = "📝";
    pub const TAB: &str = "🗂️";
    pub const HOURGLASS: &str = "⏳";
    pub const GLOBE: &str = "🌍";
}
