//! Error type numbers from the bridge's error envelope.

pub const ERR_UNAUTHORIZED: u16 = 1;
pub const ERR_RESOURCE_UNAVAILABLE: u16 = 3;
pub const ERR_METHOD_UNAVAILABLE: u16 = 4;
pub const ERR_MISSING_PARAMETER: u16 = 5;
pub const ERR_PARAMETER_UNAVAILABLE: u16 = 6;
pub const ERR_INVALID_VALUE: u16 = 7;
pub const ERR_PARAMETER_READ_ONLY: u16 = 8;
pub const ERR_TOO_MANY_ITEMS: u16 = 11;
pub const ERR_LINK_BUTTON_NOT_PRESSED: u16 = 101;
pub const ERR_INTERNAL: u16 = 901;
