use crate::error::{DNSResolverError, Result};

pub fn u8_bytes_to_u16_vec<'a, T>(u8_bytes: &mut T, n: i32) -> Result<Vec<u16>>
where
    T: Iterator<Item = &'a u8>,
{
    let mut parts = vec![];
    for _ in 0..n {
        let mut u8s: [u8; 2] = [0, 0];
        for byte in u8s.iter_mut() {
            *byte = *u8_bytes.next().ok_or(DNSResolverError::Parse)?;
        }
        parts.push(u16::from_be_bytes(u8s));
    }
    Ok(parts)
}

pub fn u8_bytes_to_u32<'a, T>(u8_bytes: &mut T) -> Result<u32>
where
    T: Iterator<Item = &'a u8>,
{
    let mut u8s: [u8; 4] = [0; 4];
    for byte in u8s.iter_mut() {
        *byte = *u8_bytes.next().ok_or(DNSResolverError::Parse)?;
    }
    Ok(u32::from_be_bytes(u8s))
}
