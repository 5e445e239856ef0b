pub mod jullix;
