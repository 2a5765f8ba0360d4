// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get access to everything `error_chain!` creates.
#![allow(deprecated)]

use error_chain::*;

error_chain! {

    errors {
        InvalidDimensions(width: usize, height: usize) {
            description("invalid grid dimensions")
            display("invalid grid dimensions {}x{}: width and height must both be at least 1",
                    width, height)
        }

        OutOfBounds(x: i64, y: i64) {
            description("coordinate outside of the grid")
            display("coordinate ({}, {}) is outside of the grid", x, y)
        }

        AlreadyGenerated {
            description("maze already generated")
            display("the grid already has passages carved, generators only run on a fully walled grid")
        }

        GenerationStalled(steps: usize) {
            description("maze generation stalled")
            display("maze generation gave up after {} random walk steps", steps)
        }

        UnknownAlgorithm(name: String) {
            description("unknown algorithm")
            display("unknown algorithm '{}'", name)
        }

        NotPerfect(reason: String) {
            description("grid is not a perfect maze")
            display("grid is not a perfect maze: {}", reason)
        }
    }
}
