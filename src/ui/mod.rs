pub mod command_box;
