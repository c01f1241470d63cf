use bullet_bridge::bindings::{
    bullet_record_size, bullet_schema_version, create_bullet, destroy_bullet,
};
use bullet_bridge::Bullet;
use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;

/// Owns the C strings for one call.
struct Tags {
    _owned: Vec<CString>,
    ptrs: Vec<*const c_char>,
}

impl Tags {
    fn new(tags: &[&str]) -> Self {
        let owned: Vec<CString> = tags.iter().map(|t| CString::new(*t).unwrap()).collect();
        let ptrs = owned.iter().map(|c| c.as_ptr()).collect();
        Self {
            _owned: owned,
            ptrs,
        }
    }

    fn create(&self, count: c_int) -> Option<Bullet> {
        unsafe {
            let raw = create_bullet(self.ptrs.as_ptr(), count);
            if raw.is_null() {
                return None;
            }
            let bullet = *raw;
            destroy_bullet(raw);
            Some(bullet)
        }
    }
}

#[test]
fn test_zero_count_is_null() {
    assert!(Tags::new(&["C", "go"]).create(0).is_none());
    assert!(Tags::new(&[]).create(0).is_none());
}

#[test]
fn test_null_tags_is_null() {
    assert!(unsafe { create_bullet(ptr::null(), 2) }.is_null());
}

#[test]
fn test_split_shot_through_abi() {
    let b = Tags::new(&["C"]).create(1).unwrap();
    assert_eq!(b.count(), 2);
    assert_eq!(b.mp_cost(), 2);
}

#[test]
fn test_bogus_tag_through_abi() {
    let b = Tags::new(&["bogus", "C"]).create(1).unwrap();
    assert_eq!(b, Bullet::default());
}

#[test]
fn test_go_through_abi() {
    let b = Tags::new(&["C", "go"]).create(2).unwrap();
    assert_eq!(b.hp(), 2);
}

#[test]
fn test_null_entry_halts_sequence() {
    let c = CString::new("C").unwrap();
    let tags = [c.as_ptr(), ptr::null(), c.as_ptr()];
    unsafe {
        let raw = create_bullet(tags.as_ptr(), 3);
        assert!(!raw.is_null());
        assert_eq!((*raw).count(), 2);
        destroy_bullet(raw);
    }
}

#[test]
fn test_destroy_null_is_noop() {
    unsafe { destroy_bullet(ptr::null_mut()) };
}

#[test]
fn test_layout_queries() {
    assert_eq!(bullet_record_size(), 25);
    assert_eq!(bullet_record_size(), std::mem::size_of::<Bullet>());
    assert_eq!(bullet_schema_version(), 1);
}
