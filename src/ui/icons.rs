pub struct Icons;

impl Icons {
    pub const FILM: &str = "🎬";
    pub const PERSON: &str = "👤";
    pub const STAR: &str = "⭐";
    pub const CLOCK: &str = "⏱️";
    pub const LINK: &str = "🔗";
    pub const GLOBE: &str = "🌐";
    pub const DATABASE: &str = "🗄️";
    pub const FOLDER: &str = "📁";
    pub const STATS: &str = "📊";
    pub const SEARCH: &str = "🔍";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
}
