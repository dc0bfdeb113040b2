//! K-way agreement across one read's subread lanes: emits a `ReadPosition`
//! whenever every lane's current candidate agrees after adjusting for its
//! in-read offset.

use sim_core::Fifo;

use crate::model::ReadPosition;
use crate::position_table_ctrl::PositionTableCtrl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Stitching,
    Flushing,
}

pub struct Stitcher {
    state: State,
    output: Fifo<ReadPosition>,
}

impl Stitcher {
    #[must_use]
    pub fn new(output_fifo_length: usize) -> Self {
        Self {
            state: State::Stitching,
            output: Fifo::new(output_fifo_length),
        }
    }

    #[must_use]
    pub fn read_position_ready(&self) -> bool {
        !self.output.is_empty()
    }

    #[must_use]
    pub fn read_position_data(&self) -> ReadPosition {
        self.output.read_data()
    }

    pub fn read_request(&mut self) {
        self.output.read_request();
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.output.is_empty()
    }

    pub fn tick(&mut self, lanes: &mut [PositionTableCtrl]) {
        if lanes.iter().all(PositionTableCtrl::position_ready) {
            match self.state {
                State::Stitching => self.stitch(lanes),
                State::Flushing => self.flush_iteration(lanes),
            }
        }
        self.output.next_clock_cycle();
    }

    fn stitch(&mut self, lanes: &mut [PositionTableCtrl]) {
        if lanes.iter().any(|lane| lane.position_data().empty) {
            self.flush_iteration(lanes);
            return;
        }

        let adjusted: Vec<u32> = lanes
            .iter()
            .map(|lane| {
                let result = lane.position_data();
                result.position - result.subread.subread_offset * result.subread.length
            })
            .collect();
        let max_adjusted = *adjusted.iter().max().expect("stitcher always has at least one lane");

        if adjusted.iter().all(|&value| value == adjusted[0]) {
            let first = lanes[0].position_data();
            self.output.write_request(ReadPosition {
                read_id: first.subread.read_id,
                position: first.position,
            });
            let mut reached_end = false;
            for lane in lanes.iter_mut() {
                if lane.position_data().last {
                    reached_end = true;
                }
                lane.read_request();
            }
            if reached_end {
                self.state = State::Flushing;
            }
        } else {
            for (i, lane) in lanes.iter_mut().enumerate() {
                if adjusted[i] < max_adjusted {
                    let last = lane.position_data().last;
                    lane.read_request();
                    if last {
                        self.state = State::Flushing;
                        break;
                    }
                }
            }
        }
    }

    /// Pop every lane that isn't at its read boundary yet; once all lanes
    /// are simultaneously at `last`, pop them together and resume stitching.
    fn flush_iteration(&mut self, lanes: &mut [PositionTableCtrl]) {
        if lanes.iter().all(|lane| lane.position_data().last) {
            for lane in lanes.iter_mut() {
                lane.read_request();
            }
            self.state = State::Stitching;
        } else {
            for lane in lanes.iter_mut() {
                if !lane.position_data().last {
                    lane.read_request();
                }
            }
            self.state = State::Flushing;
        }
    }
}
