//! Dictionary/JSON export of [`StochasticChannel`]s.

use ndarray as nd;
use num_complex::Complex64 as C64;
use serde::Serialize;
use crate::circuit::{ CircuitInstruction, Instruction };
use super::StochasticChannel;

/// A single instruction parameter.
///
/// Complex matrix elements are written as `[re, im]` pairs.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Param {
    /// A rotation angle, in radians.
    Angle(f64),
    /// A row-major complex matrix.
    Matrix(Vec<Vec<[f64; 2]>>),
}

impl From<&nd::Array2<C64>> for Param {
    fn from(mat: &nd::Array2<C64>) -> Self {
        Self::Matrix(
            mat.outer_iter()
                .map(|row| row.iter().map(|z| [z.re, z.im]).collect())
                .collect()
        )
    }
}

/// Export record for one placed instruction.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InstructionDict {
    /// Custom label if present, otherwise the canonical name.
    pub name: String,
    pub qubits: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Param>>,
}

impl From<&CircuitInstruction> for InstructionDict {
    fn from(instr: &CircuitInstruction) -> Self {
        let params: Option<Vec<Param>> =
            match instr.op() {
                Instruction::Gate(gate) if gate.is_rot()
                    => gate.angle().map(|ang| vec![Param::Angle(ang.radians())]),
                Instruction::Unitary(unitary)
                    => Some(vec![unitary.operator().data().into()]),
                Instruction::Kraus(kraus)
                    => Some(kraus.ops().iter().map(Param::from).collect()),
                _ => None,
            };
        Self {
            name: instr.op().display_name().to_string(),
            qubits: instr.qubits().to_vec(),
            params,
        }
    }
}

/// Export record for a whole channel.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NoiseDict {
    /// Always `"qerror"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Per-term instruction lists, in term order.
    pub instructions: Vec<Vec<InstructionDict>>,
    pub probabilities: Vec<f64>,
}

impl StochasticChannel {
    /// Return the export record of `self`.
    pub fn to_dict(&self) -> NoiseDict {
        NoiseDict {
            kind: "qerror".to_string(),
            instructions:
                self.circuits.iter()
                .map(|circ| circ.iter().map(InstructionDict::from).collect())
                .collect(),
            probabilities: self.probabilities.clone(),
        }
    }

    /// Render the export record of `self` as a JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_dict())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{ Value, json };
    use crate::{
        c,
        channel::{ Kraus, Operator },
        circuit::{ Gate, UnitaryGate },
        phase::Phase,
    };
    use super::*;

    #[test]
    fn dict_layout() {
        let chan =
            StochasticChannel::new([
                (vec![(Gate::X, vec![0]), (Gate::CZ, vec![0, 1])], 0.25),
                (vec![(Gate::I, vec![1])], 0.75),
            ])
            .unwrap();
        let dict = chan.to_dict();
        assert_eq!(dict.kind, "qerror");
        assert_eq!(dict.probabilities, vec![0.25, 0.75]);
        assert_eq!(dict.instructions.len(), 2);
        assert_eq!(dict.instructions[0][1].name, "cz");
        assert_eq!(dict.instructions[0][1].qubits, vec![0, 1]);
        assert_eq!(dict.instructions[0][1].params, None);
        assert_eq!(dict.instructions[1][0].name, "id");
    }

    #[test]
    fn json_output() -> anyhow::Result<()> {
        let chan = StochasticChannel::new([(Gate::X, 0.5), (Gate::I, 0.5)])?;
        let value: Value = serde_json::from_str(&chan.to_json()?)?;
        let expected = json!({
            "type": "qerror",
            "instructions": [
                [{ "name": "x", "qubits": [0] }],
                [{ "name": "id", "qubits": [0] }],
            ],
            "probabilities": [0.5, 0.5],
        });
        assert_eq!(value, expected);
        Ok(())
    }

    #[test]
    fn parametrized_instructions() -> anyhow::Result<()> {
        let rot = StochasticChannel::from_op(Gate::ZRot(Phase::pi2()))?;
        let dict = rot.to_dict();
        let Some(params) = &dict.instructions[0][0].params else {
            anyhow::bail!("rotation must export its angle");
        };
        assert!(
            matches!(params[..], [Param::Angle(a)] if (a - std::f64::consts::FRAC_PI_2).abs() < 1e-12)
        );

        let z = c!(0.0);
        let o = c!(1.0);
        let damp =
            Kraus::new([
                ndarray::array![[o, z], [z, c!(0.6)]],
                ndarray::array![[z, c!(0.8)], [z, z]],
            ])?;
        let chan = StochasticChannel::from_op(damp)?;
        let value: Value = serde_json::from_str(&chan.to_json()?)?;
        let instr = &value["instructions"][0][0];
        assert_eq!(instr["name"], "kraus");
        assert_eq!(instr["params"].as_array().map(Vec::len), Some(2));
        assert_eq!(instr["params"][1][0][1], json!([0.8, 0.0]));

        let labeled =
            UnitaryGate::new(Operator::new(Gate::H.matrix())?).with_label("my_h");
        let chan = StochasticChannel::from_op((Instruction::from(labeled), [1]))?;
        let dict = chan.to_dict();
        assert_eq!(dict.instructions[0][0].name, "my_h");
        assert_eq!(dict.instructions[0][0].qubits, vec![1]);
        assert!(dict.instructions[0][0].params.is_some());
        Ok(())
    }
}
