#![allow(dead_code)]

pub mod show_output;
