// Output profile trees

pub mod allocation;
pub mod time;
