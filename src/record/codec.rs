//! Explicit little-endian marshalling of [`Bullet`]
//!
//! Foreign runtimes receive these bytes rather than the host-order memory
//! image, so the wire format does not depend on the machine the bridge runs on.

use super::layout::{self, FieldLayout, RECORD_SIZE};
use super::{Bullet, Rgba};
use crate::core::error::{RecordError, RecordResult};

pub struct RecordCodec;

impl RecordCodec {
    pub fn encode(bullet: &Bullet) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        put_i32(&mut buf, layout::DAMAGE, bullet.damage());
        put_i32(&mut buf, layout::COUNT, bullet.count());
        put_i32(&mut buf, layout::SPEED, bullet.speed());
        put_i32(&mut buf, layout::HP, bullet.hp());

        let c = bullet.color();
        buf[layout::COLOR.offset..layout::COLOR.end()].copy_from_slice(&[c.r, c.g, c.b, c.a]);

        // raw byte, so a foreign echo sees exactly what native code wrote
        buf[layout::DAMAGE_BY_FRAME.offset] = bullet.damage_by_frame_raw();
        put_i32(&mut buf, layout::MP_COST, bullet.mp_cost());
        buf
    }

    /// Rejects anything that is not exactly one record with a 0/1 flag byte.
    pub fn decode(bytes: &[u8]) -> RecordResult<Bullet> {
        if bytes.len() != RECORD_SIZE {
            return Err(RecordError::LengthMismatch {
                expected: RECORD_SIZE,
                actual: bytes.len(),
            });
        }

        let flag = bytes[layout::DAMAGE_BY_FRAME.offset];
        if flag > 1 {
            return Err(RecordError::InvalidFlag(flag));
        }

        let color = &bytes[layout::COLOR.offset..layout::COLOR.end()];

        let mut bullet = Bullet::default();
        bullet.set_damage(get_i32(bytes, layout::DAMAGE));
        bullet.set_count(get_i32(bytes, layout::COUNT));
        bullet.set_speed(get_i32(bytes, layout::SPEED));
        bullet.set_hp(get_i32(bytes, layout::HP));
        bullet.set_color(Rgba::new(color[0], color[1], color[2], color[3]));
        bullet.set_damage_by_frame(flag == 1);
        bullet.set_mp_cost(get_i32(bytes, layout::MP_COST));
        Ok(bullet)
    }
}

fn put_i32(buf: &mut [u8; RECORD_SIZE], field: FieldLayout, value: i32) {
    buf[field.offset..field.end()].copy_from_slice(&value.to_le_bytes());
}

fn get_i32(bytes: &[u8], field: FieldLayout) -> i32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[field.offset..field.end()]);
    i32::from_le_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_default() {
        let bytes = RecordCodec::encode(&Bullet::default());
        assert_eq!(
            bytes,
            [
                1, 0, 0, 0, // damage
                1, 0, 0, 0, // count
                1, 0, 0, 0, // speed
                0, 0, 0, 0, // hp
                0xFF, 0xFF, 0xFF, 0xFF, // color
                0, // damage_by_frame
                1, 0, 0, 0, // mp_cost
            ]
        );
    }

    #[test]
    fn test_decode_negative_values() {
        let mut bytes = RecordCodec::encode(&Bullet::default());
        bytes[12..16].copy_from_slice(&(-40i32).to_le_bytes());
        let b = RecordCodec::decode(&bytes).unwrap();
        assert_eq!(b.hp(), -40);
    }

    #[test]
    fn test_decode_rejects_short_buffer() {
        let bytes = RecordCodec::encode(&Bullet::default());
        assert_eq!(
            RecordCodec::decode(&bytes[..24]),
            Err(RecordError::LengthMismatch {
                expected: 25,
                actual: 24
            })
        );
    }

    #[test]
    fn test_decode_rejects_long_buffer() {
        let mut bytes = RecordCodec::encode(&Bullet::default()).to_vec();
        bytes.push(0);
        assert!(matches!(
            RecordCodec::decode(&bytes),
            Err(RecordError::LengthMismatch { actual: 26, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_flag() {
        let mut bytes = RecordCodec::encode(&Bullet::default());
        bytes[20] = 2;
        assert_eq!(RecordCodec::decode(&bytes), Err(RecordError::InvalidFlag(2)));
    }

    #[test]
    fn test_encode_keeps_raw_flag_byte() {
        let mut native: [u8; RECORD_SIZE] = bytemuck::cast(Bullet::default());
        native[layout::DAMAGE_BY_FRAME.offset] = 2;
        let b: Bullet = bytemuck::cast(native);

        let bytes = RecordCodec::encode(&b);
        assert_eq!(bytes[20], 2);
        assert_eq!(RecordCodec::decode(&bytes), Err(RecordError::InvalidFlag(2)));
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn test_wire_matches_native_on_little_endian() {
        let mut b = Bullet::default();
        b.set_speed(300);
        b.set_color(Rgba::new(1, 2, 3, 4));
        assert_eq!(&RecordCodec::encode(&b)[..], b.as_bytes());
    }

    fn arb_bullet() -> impl Strategy<Value = Bullet> {
        (
            any::<[i32; 4]>(),
            any::<[u8; 4]>(),
            any::<bool>(),
            any::<i32>(),
        )
            .prop_map(|([damage, count, speed, hp], c, flag, mp_cost)| {
                let mut b = Bullet::default();
                b.set_damage(damage);
                b.set_count(count);
                b.set_speed(speed);
                b.set_hp(hp);
                b.set_color(Rgba::new(c[0], c[1], c[2], c[3]));
                b.set_damage_by_frame(flag);
                b.set_mp_cost(mp_cost);
                b
            })
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(b in arb_bullet()) {
            let bytes = RecordCodec::encode(&b);
            prop_assert_eq!(RecordCodec::decode(&bytes).unwrap(), b);
        }

        #[test]
        fn decode_never_accepts_wrong_length(len in 0usize..64) {
            prop_assume!(len != RECORD_SIZE);
            let buf = vec![0u8; len];
            let is_length_mismatch = matches!(
                RecordCodec::decode(&buf),
                Err(RecordError::LengthMismatch { .. })
            );
            prop_assert!(is_length_mismatch);
        }
    }
}
