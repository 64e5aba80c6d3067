mod common;
mod decision;
mod levels;
