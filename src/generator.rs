//! `CageGen`: a lazy, pull-based sequence of cages, optionally ending in a fork.

use crate::cage::Cage;
use crate::errors::CageError;
use crate::fork::CageFork;
use std::iter;

/// One element of a [`CageGen`].
#[derive(Debug)]
pub enum CageStep<'a> {
    Cage(Cage),
    Fork(CageFork<'a>),
}

impl From<Cage> for CageStep<'_> {
    fn from(cage: Cage) -> Self {
        CageStep::Cage(cage)
    }
}

impl<'a> From<CageFork<'a>> for CageStep<'a> {
    fn from(fork: CageFork<'a>) -> Self {
        CageStep::Fork(fork)
    }
}

type Steps<'a> = Box<dyn Iterator<Item = Result<CageStep<'a>, CageError>> + 'a>;

/// A sequence of cross-sections, possibly infinite, consumed once by
/// [`CageGen::to_mesh`](crate::traversal).
///
/// A fork can only be the last element: the constructors that add one
/// ([`CageGen::with_fork`], [`CageGen::then_fork`]) put it after every cage, and
/// the traversal never pulls past a fork.
///
/// The generator also remembers whether it is known to end. Traversing a
/// sequence that is not known to end requires a step budget.
pub struct CageGen<'a> {
    steps: Steps<'a>,
    finite: bool,
}

impl<'a> CageGen<'a> {
    /// Wraps any iterator of cages. The sequence counts as finite when the
    /// iterator reports an upper bound on its length.
    pub fn new<I>(cages: I) -> Self
    where
        I: IntoIterator<Item = Cage>,
        I::IntoIter: 'a,
    {
        let cages = cages.into_iter();
        let finite = cages.size_hint().1.is_some();
        CageGen {
            steps: Box::new(cages.map(|c| Ok(CageStep::Cage(c)))),
            finite,
        }
    }

    /// Like [`CageGen::new`], for iterators whose cages are built fallibly. The
    /// first error ends the traversal.
    pub fn try_new<I>(cages: I) -> Self
    where
        I: IntoIterator<Item = Result<Cage, CageError>>,
        I::IntoIter: 'a,
    {
        let cages = cages.into_iter();
        let finite = cages.size_hint().1.is_some();
        CageGen {
            steps: Box::new(cages.map(|c| c.map(CageStep::Cage))),
            finite,
        }
    }

    /// A finite sequence from an owned list.
    pub fn from_cages(cages: Vec<Cage>) -> Self {
        CageGen::new(cages)
    }

    /// `cages` followed by `fork`.
    pub fn with_fork<I>(cages: I, fork: CageFork<'a>) -> Self
    where
        I: IntoIterator<Item = Cage>,
        I::IntoIter: 'a,
    {
        CageGen::new(cages).then_fork(move || Ok(fork))
    }

    /// Appends a fork built on demand, once every cage of `self` has been
    /// pulled. `make_fork` never runs if the traversal stops earlier, which
    /// keeps self-similar recursion lazy.
    pub fn then_fork<F>(self, make_fork: F) -> Self
    where
        F: FnOnce() -> Result<CageFork<'a>, CageError> + 'a,
    {
        let tail = iter::once_with(move || make_fork().map(CageStep::Fork));
        CageGen {
            steps: Box::new(self.steps.chain(tail)),
            finite: self.finite,
        }
    }

    /// At most the first `n` elements.
    pub fn take(self, n: usize) -> Self {
        CageGen {
            steps: Box::new(self.steps.take(n)),
            finite: true,
        }
    }

    /// Marks the sequence as ending, for iterators that end but cannot say so
    /// through `size_hint`.
    pub fn assume_finite(mut self) -> Self {
        self.finite = true;
        self
    }

    pub fn is_finite(&self) -> bool {
        self.finite
    }
}

impl<'a> Iterator for CageGen<'a> {
    type Item = Result<CageStep<'a>, CageError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.steps.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.steps.size_hint()
    }
}

impl<'a> FromIterator<Cage> for CageGen<'a> {
    fn from_iter<T: IntoIterator<Item = Cage>>(iter: T) -> Self {
        CageGen::from_cages(iter.into_iter().collect())
    }
}

impl From<Vec<Cage>> for CageGen<'_> {
    fn from(cages: Vec<Cage>) -> Self {
        CageGen::from_cages(cages)
    }
}

impl std::fmt::Debug for CageGen<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CageGen")
            .field("finite", &self.finite)
            .finish_non_exhaustive()
    }
}
