// Presentation strings for the tab bar and status line.  No drawing here.

pub mod tabs;
