use crate::error::{DNSResolverError, Result};
use strum_macros::{AsRefStr, Display, EnumString};

// Creates the provided enum and generates a TryFrom trait implementation
// to convert a u16 to its equivalent variant.
macro_rules! rr_type {
    ($(#[$meta:meta])* $vis:vis enum $name:ident {
        $($variant:ident$( = $val:literal)?),*
    ,}) => {
        $(#[$meta])*
        $vis enum $name {
            $($variant$( = $val)?),*
        }

        impl TryFrom<u16> for $name {
            type Error = DNSResolverError;

            fn try_from(v: u16) -> Result<Self> {
                match v {
                    $(x if x == $name::$variant as u16 => Ok($name::$variant),)*
                    _ => Err(DNSResolverError::InvalidRecordType(v.to_string())),
                }
            }
        }
    };
}

rr_type!(
    #[derive(Debug, EnumString, Display, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
    pub enum RRType {
        A = 1,
        NS,
        MD,
        MF,
        CNAME,
        SOA,
        MB,
        MG,
        MR,
        NULL,
        WKS,
        PTR,
        HINFO,
        MINFO,
        MX,
        TXT,
        AAAA = 28,
    }
);

// The only class this resolver speaks.
pub const CLASS_IN: u16 = 1;

// The RCODE carried in the low four bits of the header flags.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum ResponseCode {
    #[strum(serialize = "NOERROR")]
    NoError,
    #[strum(serialize = "FORMERR")]
    FormErr,
    #[strum(serialize = "SERVFAIL")]
    ServFail,
    #[strum(serialize = "NXDOMAIN")]
    NXDomain,
    #[strum(serialize = "NOTIMP")]
    NotImp,
    #[strum(serialize = "REFUSED")]
    Refused,
    #[strum(serialize = "UNKNOWN")]
    Unknown(u8),
}

impl From<u8> for ResponseCode {
    fn from(v: u8) -> Self {
        match v & 0x0f {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NXDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Unknown(other),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(code: ResponseCode) -> Self {
        match code {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NXDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Unknown(v) => v & 0x0f,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_record_type_from_wire_value() {
        assert_eq!(RRType::try_from(1).unwrap(), RRType::A);
        assert_eq!(RRType::try_from(2).unwrap(), RRType::NS);
        assert_eq!(RRType::try_from(5).unwrap(), RRType::CNAME);
        assert_eq!(RRType::try_from(16).unwrap(), RRType::TXT);
        assert_eq!(RRType::try_from(28).unwrap(), RRType::AAAA);
        assert!(matches!(
            RRType::try_from(41),
            Err(DNSResolverError::InvalidRecordType(v)) if v == "41"
        ));
    }

    #[test]
    fn test_record_type_names() {
        assert_eq!(RRType::from_str("CNAME").unwrap(), RRType::CNAME);
        assert_eq!(RRType::AAAA.to_string(), "AAAA");
    }

    #[test]
    fn test_response_code_round_trips_low_bits() {
        assert_eq!(ResponseCode::from(0), ResponseCode::NoError);
        assert_eq!(ResponseCode::from(3), ResponseCode::NXDomain);
        assert_eq!(ResponseCode::from(9), ResponseCode::Unknown(9));
        assert_eq!(u8::from(ResponseCode::Refused), 5);
        assert_eq!(ResponseCode::NXDomain.to_string(), "NXDOMAIN");
    }
}
