/// A port-based classification with a fixed summary and tags.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PortApp {
    pub ports: &'static [u16],
    pub summary: &'static str,
    pub tag: &'static str,
    pub app_tag: &'static str,
}

impl PortApp {
    pub(crate) const fn new(
        ports: &'static [u16],
        summary: &'static str,
        tag: &'static str,
        app_tag: &'static str,
    ) -> Self {
        Self {
            ports,
            summary,
            tag,
            app_tag,
        }
    }
}

/// First table entry whose ports contain either side of the conversation.
pub(crate) fn lookup_port_app(
    table: &'static [PortApp],
    src_port: u16,
    dst_port: u16,
) -> Option<&'static PortApp> {
    table
        .iter()
        .find(|entry| entry.ports.contains(&src_port) || entry.ports.contains(&dst_port))
}
