//! Native effects and a byte transform exported with the C ABI, loaded by
//! the bridge's shared-library tests.

use std::os::raw::c_int;
use std::slice;

#[repr(C, packed)]
#[allow(dead_code)]
pub struct Bullet {
    damage: i32,
    count: i32,
    speed: i32,
    hp: i32,
    color: [u8; 4],
    damage_by_frame: u8,
    mp_cost: i32,
}

const RECORD_SIZE: usize = 25;
const HP: usize = 12;

/// `count += 10`
#[no_mangle]
pub unsafe extern "C" fn c_create_bullet(bullet: *mut Bullet) {
    let count = (*bullet).count;
    (*bullet).count = count.wrapping_add(10);
}

/// `damage = stacking * 100`, so callers can see the index that arrived
#[no_mangle]
pub unsafe extern "C" fn cpp_create_bullet(bullet: *mut Bullet, stacking: c_int) {
    (*bullet).damage = stacking.wrapping_mul(100);
}

/// Copies the snapshot and adds 5 to hp. The incoming hp selects a failure:
///
/// - `-1`: returns error code `-7`
/// - `-2`: claims one byte more than `output_capacity`
/// - `-3`: writes one byte less than a record
#[no_mangle]
pub unsafe extern "C" fn bullet_transform(
    input: *const u8,
    input_len: usize,
    output: *mut u8,
    output_capacity: usize,
) -> isize {
    if input_len != RECORD_SIZE || output_capacity < RECORD_SIZE {
        return -1;
    }
    let input = slice::from_raw_parts(input, input_len);
    let output = slice::from_raw_parts_mut(output, output_capacity);

    let mut hp = [0u8; 4];
    hp.copy_from_slice(&input[HP..HP + 4]);
    let hp = i32::from_le_bytes(hp);

    match hp {
        -1 => -7,
        -2 => output_capacity as isize + 1,
        -3 => {
            output[..RECORD_SIZE - 1].copy_from_slice(&input[..RECORD_SIZE - 1]);
            (RECORD_SIZE - 1) as isize
        }
        _ => {
            output[..RECORD_SIZE].copy_from_slice(input);
            output[HP..HP + 4].copy_from_slice(&hp.wrapping_add(5).to_le_bytes());
            RECORD_SIZE as isize
        }
    }
}
