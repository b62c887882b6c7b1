pub mod spymaster;
