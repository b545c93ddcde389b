// Domain layer: launchd identities, captured command output and the ports the service layer drives.

pub mod model;
pub mod ports;
