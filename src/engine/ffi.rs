// ffi.rs — liblz4 entry points that lz4-sys links but does not declare.
//
// All of these are compiled into the bundled liblz4 (lz4frame.c / lz4.c of
// lz4 1.10.0) that lz4-sys builds, so declaring them here is enough to link.

use lz4::liblz4::{c_char, c_uint, c_void, size_t, LZ4FPreferences};

extern "C" {
    // size_t LZ4F_compressFrameBound(size_t srcSize, const LZ4F_preferences_t* prefsPtr);
    pub fn LZ4F_compressFrameBound(src_size: size_t, prefs: *const LZ4FPreferences) -> size_t;

    // size_t LZ4F_compressFrame(void* dstBuffer, size_t dstCapacity,
    //                           const void* srcBuffer, size_t srcSize,
    //                           const LZ4F_preferences_t* preferencesPtr);
    pub fn LZ4F_compressFrame(
        dst: *mut c_void,
        dst_capacity: size_t,
        src: *const c_void,
        src_size: size_t,
        prefs: *const LZ4FPreferences,
    ) -> size_t;

    // unsigned LZ4F_getVersion(void);
    pub fn LZ4F_getVersion() -> c_uint;

    // const char* LZ4_versionString(void);
    pub fn LZ4_versionString() -> *const c_char;
}
