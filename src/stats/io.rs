use super::raw::BlkioEntry;

const READ_OP: &str = "read";
const WRITE_OP: &str = "write";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(super) struct Io {
    pub read_bytes: u64,
    pub write_bytes: u64,
}

/// Accumulates read and write bytes across all devices.
///
/// Operation names are matched case-insensitively (cgroup v1 reports `Read`,
/// cgroup v2 `read`). Other operations such as `Sync` or `Total` are ignored.
pub(super) fn derive(entries: &[BlkioEntry]) -> Io {
    entries.iter().fold(Io::default(), |mut io, entry| {
        if entry.op.eq_ignore_ascii_case(READ_OP) {
            io.read_bytes = io.read_bytes.saturating_add(entry.value);
        } else if entry.op.eq_ignore_ascii_case(WRITE_OP) {
            io.write_bytes = io.write_bytes.saturating_add(entry.value);
        }
        io
    })
}
