pub mod collaboration;
