// Unit tests for profile_types

mod profile_types_test;
