use crate::ast::{Accessor, EResult, ErrorKind, Key, Value};
use crate::heap::ObjId;
use crate::Evaluator;

/// Pairs of uncast containers currently being compared.
type Comparing = Vec<(ObjId, ObjId)>;

/**********************\
|* Language equality  *|
\**********************/
// Containers compare over their uncast sources, member by member, and stop
// at the first difference. Casts never make two views of one object
// unequal. Meeting the same pair again while comparing it is a cycle.
impl Evaluator {
    pub fn values_equal(&self, lhs: &Value, rhs: &Value) -> EResult<bool> {
        self.equal_in(lhs, rhs, &mut Vec::new())
    }

    fn equal_in(
        &self,
        lhs: &Value,
        rhs: &Value,
        open: &mut Comparing,
    ) -> EResult<bool> {
        match (lhs, rhs) {
            (Value::Listing(a), Value::Listing(b)) => {
                let pair = (self.uncast(*a), self.uncast(*b));
                self.containers_equal(pair, open, Self::listings_equal)
            },
            (Value::Mapping(a), Value::Mapping(b)) => {
                let pair = (self.uncast(*a), self.uncast(*b));
                self.containers_equal(pair, open, Self::mappings_equal)
            },
            (Value::List(a), Value::List(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                for (x, y) in a.iter().zip(b.iter()) {
                    if !self.equal_in(x, y, open)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            },
            (Value::Pair(a), Value::Pair(b)) => {
                Ok(self.equal_in(&a.0, &b.0, open)?
                    && self.equal_in(&a.1, &b.1, open)?)
            },
            _ => Ok(lhs == rhs),
        }
    }

    fn containers_equal(
        &self,
        (a, b): (ObjId, ObjId),
        open: &mut Comparing,
        compare: fn(&Self, ObjId, ObjId, &mut Comparing) -> EResult<bool>,
    ) -> EResult<bool> {
        if a == b {
            return Ok(true);
        }
        if open.contains(&(a, b)) {
            return Err(ErrorKind::CyclicEvaluation.into());
        }
        open.push((a, b));
        let result = compare(self, a, b, open);
        open.pop();
        result
    }

    fn listings_equal(
        &self,
        a: ObjId,
        b: ObjId,
        open: &mut Comparing,
    ) -> EResult<bool> {
        let length = self.object_length(a);
        if length != self.object_length(b) {
            return Ok(false);
        }
        for i in 0..length {
            if !self.members_equal(a, b, &Key::Int(i as isize), open)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn mappings_equal(
        &self,
        a: ObjId,
        b: ObjId,
        open: &mut Comparing,
    ) -> EResult<bool> {
        let a_keys = self.object_keys(a);
        let b_keys = self.object_keys(b);
        if a_keys.len() != b_keys.len()
            || a_keys.keys().any(|key| !b_keys.contains_key(key))
        {
            return Ok(false);
        }
        for key in a_keys.keys() {
            if !self.members_equal(a, b, key, open)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// A member that fails on one side only makes the containers unequal.
    /// Cycles always propagate, as does a failure on both sides.
    fn members_equal(
        &self,
        a: ObjId,
        b: ObjId,
        key: &Key,
        open: &mut Comparing,
    ) -> EResult<bool> {
        let lhs = self.get_key(&self.container_value(a), key);
        let rhs = self.get_key(&self.container_value(b), key);

        match (lhs, rhs) {
            (Ok(x), Ok(y)) => {
                self.equal_in(&x, &y, open)
                    .map_err(|err| err.at(Accessor::Member(key.clone())))
            },
            (Err(err), Ok(_)) | (Ok(_), Err(err)) => {
                if err.is_cyclic() {
                    Err(err)
                } else {
                    Ok(false)
                }
            },
            (Err(lhs), Err(rhs)) => {
                if rhs.is_cyclic() {
                    Err(rhs)
                } else {
                    Err(lhs)
                }
            },
        }
    }
}
