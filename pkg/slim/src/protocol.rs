//! Slim `core/v1` `Protocol`.

open_enum! {
    /// IP protocol of a port.
    ///
    /// Unrecognized values are carried verbatim.
    pub struct Protocol {
        TCP = "TCP",
        UDP = "UDP",
        SCTP = "SCTP",
    }
}
