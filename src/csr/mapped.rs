use std::ffi::CString;
use std::fs;
use std::io;
use std::os::unix::io::{
	FromRawFd,
};
use std::path::Path;
use std::ptr;

use libc::{
	MAP_SHARED,
	O_CLOEXEC,
	O_RDWR,
	O_SYNC,
	PROT_READ,
	PROT_WRITE,
	c_void,
	mmap,
	munmap,
	off_t,
	open,
};

use super::CsrAccess;

/// A window of physical address space (`/dev/mem`, a PCIe BAR resource file,
/// a UIO device, ...) mapped into our address space.
#[derive(Debug)]
pub struct Mapped {
	ptr: ptr::NonNull<u8>, // u8 instead of void for easier offset operations
	len: usize,
	base: u64,
}

impl Drop for Mapped {
	fn drop(&mut self) {
		unsafe {
			let res = munmap(
				self.ptr.as_ptr() as *mut c_void,
				self.len,
			);
			if 0 != res {
				panic!("munmap failed: {}", io::Error::last_os_error());
			}
		}
	}
}

impl Mapped {
	pub fn base(&self) -> u64 {
		self.base
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn read_dword(&self, offset: usize) -> u32 {
		assert!(offset & 3 == 0);
		assert!(offset + 3 < self.len);
		u32::from_le(unsafe { ptr::read_volatile(self.ptr.as_ptr().add(offset) as *const u32) })
	}

	pub fn write_dword(&mut self, offset: usize, data: u32) {
		assert!(offset & 3 == 0);
		assert!(offset + 3 < self.len);
		unsafe { ptr::write_volatile(self.ptr.as_ptr().add(offset) as *mut u32, data.to_le()) }
	}

	pub fn read_dwords(&self, offset: usize, target: &mut [u32]) {
		for (i, word) in target.iter_mut().enumerate() {
			*word = self.read_dword(offset + 4 * i);
		}
	}
}

impl CsrAccess for Mapped {
	fn read_csr(&self, offset: usize) -> u32 {
		self.read_dword(offset)
	}

	fn write_csr(&mut self, offset: usize, data: u32) {
		self.write_dword(offset, data)
	}
}

// TODO: exclusive open / file locking?
pub fn open_mapped(path: &Path, base: u64, len: usize) -> io::Result<Mapped> {
	if base & 0xfff != 0 {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("base address 0x{:x} not page aligned", base)));
	}
	if base > off_t::max_value() as u64 {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("base address 0x{:x} too large", base)));
	}

	let path = CString::new(path.to_string_lossy().into_owned())?;

	let fd = unsafe { open(path.as_ptr(), O_RDWR | O_CLOEXEC | O_SYNC) };
	if -1 == fd {
		return Err(io::Error::last_os_error());
	}
	// now get fd managed to prevent resource leak; the mapping stays valid
	// after closing it
	let _f = unsafe { fs::File::from_raw_fd(fd) };

	let area = unsafe {
		mmap(
			ptr::null_mut(),
			len,
			PROT_READ | PROT_WRITE,
			MAP_SHARED,
			fd,
			base as off_t,
		)
	};

	if area as usize == !0usize {
		return Err(io::Error::last_os_error());
	}
	match ptr::NonNull::new(area as *mut u8) {
		None => panic!("mmap shouldn't return NULL ever"),
		Some(area) => Ok(Mapped{
			ptr: area,
			len,
			base,
		}),
	}
}
