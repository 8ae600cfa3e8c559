use crate::protocols::common::ports::PortApp;

pub const MIN_HEADER_LEN: usize = 20;
pub const SRC_PORT_OFFSET: usize = 0;
pub const DST_PORT_OFFSET: usize = 2;
pub const DATA_OFFSET_OFFSET: usize = 12;
pub const FLAGS_OFFSET: usize = 13;

/// Port-only classifications, consulted after the payload sniffers.
pub(crate) const PORT_APPS: &[PortApp] = &[
    PortApp::new(&[179], "BGP", "BGP", "BGP"),
    PortApp::new(&[22], "SSH", "SSH", "SSH"),
    PortApp::new(&[23], "Telnet", "TELNET", "TELNET"),
    PortApp::new(&[21], "FTP", "FTP", "FTP"),
    PortApp::new(&[990], "FTPS", "FTPS", "FTPS"),
    PortApp::new(&[25, 587], "SMTP", "SMTP", "SMTP"),
    PortApp::new(&[465], "SMTPS", "SMTPS", "SMTPS"),
    PortApp::new(&[110], "POP3", "POP3", "POP3"),
    PortApp::new(&[143], "IMAP", "IMAP", "IMAP"),
    PortApp::new(&[993], "IMAPS", "IMAPS", "IMAPS"),
    PortApp::new(&[389], "LDAP", "LDAP", "LDAP"),
    PortApp::new(&[636], "LDAPS", "LDAPS", "LDAPS"),
    PortApp::new(&[139, 445], "SMB", "SMB", "SMB"),
    PortApp::new(&[3389], "RDP", "RDP", "RDP"),
    PortApp::new(&[554], "RTSP", "RTSP", "RTSP"),
    PortApp::new(&[5060], "SIP", "SIP", "SIP"),
    PortApp::new(&[853], "DNS over TLS", "TCP", "DOT"),
    PortApp::new(&[6379], "Redis", "TCP", "REDIS"),
    PortApp::new(&[1883], "MQTT", "TCP", "MQTT"),
    PortApp::new(&[5672], "AMQP", "TCP", "AMQP"),
    PortApp::new(&[88], "Kerberos", "TCP", "KERBEROS"),
    PortApp::new(&[11211], "Memcached", "TCP", "MEMCACHED"),
];

pub const STUN_PORT: u16 = 3478;
