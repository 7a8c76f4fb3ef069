pub mod audit;
pub mod expense;
pub mod item;
pub mod split;

pub use audit::AppLog;
pub use expense::{
    ApiCredentials, BillImage, ExpenseReceipt, ExpenseRequest, ExpenseShare, ExpenseUpdateRequest, LoadedExpense,
    MemberDirectory, RemoteExpense, RemoteExpenseUser, VoiceTranscript, round_cents,
};
pub use item::{DetectedItem, Item, MemberName, RawPrice};
pub use split::{FinalSplit, ItemizedSplit, MemberSplit};
